//! OpenAI Images API integration.

mod dto;
mod illustrator;

pub use dto::{
    ImageData, ImageGenerationRequest, ImageGenerationRequestBuilder, ImagesResponse,
};
pub use illustrator::{ImageModelFamily, OpenAiIllustrator};
