pub mod external;
pub mod internal;
