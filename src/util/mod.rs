pub mod cli;
pub mod clock;
pub mod hash;
pub mod random;
