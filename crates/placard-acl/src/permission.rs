//! Permission bitmasks.
//!
//! Each access control entry carries exactly one permission bit. Callers ask
//! for an ordered set of permissions and are granted access if any one of
//! them is satisfied.
//!
//! | Permission | Bit | Code |
//! |------------|-----|------|
//! | [`READ`](Permission::READ) | `1` | `R` |
//! | [`WRITE`](Permission::WRITE) | `2` | `W` |
//! | [`DELETE`](Permission::DELETE) | `8` | `D` |
//! | [`ADMINISTRATION`](Permission::ADMINISTRATION) | `16` | `A` |
//!
//! Bit `4` is reserved for a create permission that this system never uses.
//!
//! ```
//! use placard_acl::Permission;
//!
//! let requested = Permission::parse_codes("RA");
//! assert_eq!(requested, vec![Permission::READ, Permission::ADMINISTRATION]);
//! assert_eq!(Permission::ADMINISTRATION.bits(), 16);
//! ```

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// A permission mask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct Permission: u32 {
        /// Read the object.
        const READ           = 0b0_0001;
        /// Modify the object.
        const WRITE          = 0b0_0010;
        /// Delete the object.
        const DELETE         = 0b0_1000;
        /// Manage the object's permissions.
        const ADMINISTRATION = 0b1_0000;
    }
}

impl Permission {
    /// The single-bit permissions in code order.
    pub const SINGLE: [Permission; 4] = [
        Permission::READ,
        Permission::WRITE,
        Permission::DELETE,
        Permission::ADMINISTRATION,
    ];

    /// Parse a one-letter permission code (`R`, `W`, `D`, `A`).
    pub fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'R' => Some(Permission::READ),
            'W' => Some(Permission::WRITE),
            'D' => Some(Permission::DELETE),
            'A' => Some(Permission::ADMINISTRATION),
            _ => None,
        }
    }

    /// Parse a string of permission codes into single-bit permissions.
    ///
    /// Unknown codes are skipped and repeated codes collapse into one entry,
    /// so `"RRx"` yields just `[READ]`.
    pub fn parse_codes(codes: &str) -> Vec<Self> {
        let mut permissions = Vec::new();
        for permission in codes.chars().filter_map(Self::from_code) {
            if !permissions.contains(&permission) {
                permissions.push(permission);
            }
        }
        permissions
    }

    /// Split a mask into its single-bit permissions.
    pub fn split(self) -> Vec<Self> {
        Self::SINGLE
            .into_iter()
            .filter(|single| self.contains(*single))
            .collect()
    }

    /// Combine several permissions into one mask.
    pub fn combine(permissions: &[Permission]) -> Self {
        permissions
            .iter()
            .fold(Permission::empty(), |mask, permission| mask | *permission)
    }

    /// The codes of every bit set in this mask, e.g. `"RWA"`.
    pub fn codes(self) -> String {
        const CODES: [(Permission, char); 4] = [
            (Permission::READ, 'R'),
            (Permission::WRITE, 'W'),
            (Permission::DELETE, 'D'),
            (Permission::ADMINISTRATION, 'A'),
        ];
        CODES
            .iter()
            .filter(|(single, _)| self.contains(*single))
            .map(|(_, code)| *code)
            .collect()
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        write!(f, "{}", self.codes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_values() {
        assert_eq!(Permission::READ.bits(), 1);
        assert_eq!(Permission::WRITE.bits(), 2);
        assert_eq!(Permission::DELETE.bits(), 8);
        assert_eq!(Permission::ADMINISTRATION.bits(), 16);
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Permission::from_code('R'), Some(Permission::READ));
        assert_eq!(Permission::from_code('w'), Some(Permission::WRITE));
        assert_eq!(Permission::from_code('D'), Some(Permission::DELETE));
        assert_eq!(Permission::from_code('A'), Some(Permission::ADMINISTRATION));
        assert_eq!(Permission::from_code('C'), None);
    }

    #[test]
    fn test_parse_codes_skips_unknown_and_duplicates() {
        assert_eq!(
            Permission::parse_codes("RxRW"),
            vec![Permission::READ, Permission::WRITE]
        );
        assert!(Permission::parse_codes("").is_empty());
    }

    #[test]
    fn test_split_and_combine() {
        let mask = Permission::READ | Permission::ADMINISTRATION;
        assert_eq!(
            mask.split(),
            vec![Permission::READ, Permission::ADMINISTRATION]
        );
        assert_eq!(Permission::combine(&mask.split()), mask);
    }

    #[test]
    fn test_display() {
        assert_eq!(Permission::READ.to_string(), "R");
        assert_eq!(Permission::all().to_string(), "RWDA");
        assert_eq!(Permission::empty().to_string(), "-");
    }
}
