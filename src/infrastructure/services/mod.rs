mod oracle;

pub use oracle::*;
