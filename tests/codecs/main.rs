//! Codec integration tests for `nornspr-rs`

mod background;
mod dispatch;
mod palette;
mod sprites;
