mod lifecycle;
mod permissions;
mod publishing;
