//! Command-line argument definitions.

use clap::{Args, Parser, Subcommand};

/// Placard CLI - ACL administration for the advertisement backend
#[derive(Parser, Debug)]
#[command(name = "placard", version)]
#[command(about = "Placard ACL administration tool", long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration file operations
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// ACL state operations
    Acl {
        #[command(subcommand)]
        action: AclAction,
    },
}

/// `placard config ...`
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the resolved config file path
    Path,
    /// Print one value by dotted key, e.g. `acl.administrative_mode`
    Get {
        /// Dotted key
        key: String,
    },
    /// Set one value by dotted key in the config file
    Set {
        /// Dotted key
        key: String,
        /// New value; booleans and numbers are detected
        value: String,
    },
    /// Write a default config file
    Init {
        /// Target file instead of the default location
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the configuration as environment variables
    Export {
        /// Format as `--env KEY=value` for docker
        #[arg(long)]
        docker_env: bool,
    },
}

/// An object identity on the command line.
#[derive(Args, Debug, Clone)]
pub struct ObjectArgs {
    /// Object type, e.g. `advertisement`
    #[arg(long = "type")]
    pub object_type: String,
    /// Object identifier
    #[arg(long)]
    pub id: String,
}

/// A security identity on the command line.
#[derive(Args, Debug, Clone)]
pub struct SidArgs {
    /// SID name, e.g. `user/useridp/alice` or `ATTR:GROUP=UG_A`
    #[arg(long)]
    pub sid: String,
    /// Treat the SID as a granted authority instead of a principal
    #[arg(long)]
    pub authority: bool,
}

/// `placard acl ...`
#[derive(Subcommand, Debug)]
pub enum AclAction {
    /// Grant permissions to a SID, creating the ACL if needed
    Grant {
        #[command(flatten)]
        object: ObjectArgs,
        #[command(flatten)]
        sid: SidArgs,
        /// Permission codes, any of `RWDA`
        #[arg(long)]
        permissions: String,
        /// Owner principal for a newly created ACL; defaults to the SID
        #[arg(long)]
        owner: Option<String>,
    },
    /// Remove granting entries from a SID
    Revoke {
        #[command(flatten)]
        object: ObjectArgs,
        #[command(flatten)]
        sid: SidArgs,
        /// Permission codes, any of `RWDA`
        #[arg(long)]
        permissions: String,
    },
    /// Decide a permission request for the caller described by a claims file
    Check {
        #[command(flatten)]
        object: ObjectArgs,
        /// JSON file with the caller's token claims
        #[arg(long)]
        claims: String,
        /// Permission codes, any of `RWDA`
        #[arg(long)]
        permissions: String,
    },
    /// List every object the caller can reach, directly or through a parent
    Accessible {
        /// JSON file with the caller's token claims
        #[arg(long)]
        claims: String,
        /// Permission codes, any of `RWDA`
        #[arg(long, default_value = "R")]
        permissions: String,
        /// Zero-based page
        #[arg(long, default_value_t = 0)]
        page: usize,
        /// Page size; defaults to `acl.default_page_size`
        #[arg(long)]
        size: Option<usize>,
    },
    /// Link an ACL to a parent ACL
    Parent {
        #[command(flatten)]
        object: ObjectArgs,
        /// Parent object type
        #[arg(long)]
        parent_type: String,
        /// Parent object identifier
        #[arg(long)]
        parent_id: String,
    },
    /// Print one ACL
    Show {
        #[command(flatten)]
        object: ObjectArgs,
    },
    /// List the values granted for an ACL attribute
    Attributes {
        /// One of `group`, `bulletinboard`, `location`
        attribute: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_grant() {
        let cli = Cli::try_parse_from([
            "placard",
            "acl",
            "grant",
            "--type",
            "advertisement",
            "--id",
            "7",
            "--sid",
            "ATTR:GROUP=UG_A",
            "--authority",
            "--permissions",
            "RW",
        ])
        .unwrap();
        match cli.command {
            Command::Acl {
                action:
                    AclAction::Grant {
                        object,
                        sid,
                        permissions,
                        owner,
                    },
            } => {
                assert_eq!(object.object_type, "advertisement");
                assert_eq!(object.id, "7");
                assert!(sid.authority);
                assert_eq!(permissions, "RW");
                assert!(owner.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["placard", "config", "path", "--config", "/tmp/p.toml"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("/tmp/p.toml"));
    }

    #[test]
    fn test_accessible_defaults() {
        let cli =
            Cli::try_parse_from(["placard", "acl", "accessible", "--claims", "c.json"]).unwrap();
        match cli.command {
            Command::Acl {
                action:
                    AclAction::Accessible {
                        permissions,
                        page,
                        size,
                        ..
                    },
            } => {
                assert_eq!(permissions, "R");
                assert_eq!(page, 0);
                assert!(size.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_missing_permissions_is_rejected() {
        let result = Cli::try_parse_from([
            "placard", "acl", "revoke", "--type", "advertisement", "--id", "1", "--sid", "bob",
        ]);
        assert!(result.is_err());
    }
}
