//! Test helpers shared across Pushgate crates.

pub mod channels;
pub mod fixtures;

pub use channels::{FailAt, FailingChannel, RecordedSend, RecordingChannel};
pub use fixtures::{TEST_KEY_CONTENTS, raw_config, write_config_file, write_key_file};
