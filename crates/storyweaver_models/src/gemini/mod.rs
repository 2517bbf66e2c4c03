//! Google Gemini text service.
//!
//! [`GeminiWriter`] sends one `generateContent` request per
//! [`StoryWriter::write`](storyweaver_interface::StoryWriter::write) call.

mod writer;

pub use writer::GeminiWriter;
