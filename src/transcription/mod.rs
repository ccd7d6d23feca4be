pub mod whisper;

pub use whisper::WhisperTranscriber;
