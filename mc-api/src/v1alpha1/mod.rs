mod memcacheds;

pub use memcacheds::*;
