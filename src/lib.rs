pub mod compute;
pub mod entities;
pub mod levels;
pub mod scores;
