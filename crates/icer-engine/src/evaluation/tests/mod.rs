mod common;
mod ratio;
