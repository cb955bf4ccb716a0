pub mod export;
pub mod extract;
pub mod parsing;
pub mod pcm;
pub mod playback;
pub mod storage;
pub mod ui;
