use std::error::Error;
use std::fs;
use std::net::IpAddr;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use landfill_core::{AdvisoryStrategy, ClassificationInput, ImageInput};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "landfill",
    version,
    about = "Identify waste items and get local disposal instructions"
)]
pub struct Cli {
    /// Describe the items in words
    #[arg(long)]
    pub text: Option<String>,
    /// Path to a photo of the items
    #[arg(long, conflicts_with = "image_base64")]
    pub image: Option<PathBuf>,
    /// Base64 photo, a data URI prefix is accepted
    #[arg(long)]
    pub image_base64: Option<String>,
    /// City, region or postal code used to localize the advice
    #[arg(long)]
    pub location: Option<String>,
    /// Client IP address to derive a location from when --location is absent
    #[arg(long)]
    pub ip: Option<IpAddr>,
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_rounds: Option<u32>,
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Agentic,
    Direct,
}

impl From<StrategyArg> for AdvisoryStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Agentic => AdvisoryStrategy::Agentic,
            StrategyArg::Direct => AdvisoryStrategy::Direct,
        }
    }
}

impl Cli {
    /// Builds the request from the flags; location is filled in separately.
    pub fn input(&self) -> Result<ClassificationInput, Box<dyn Error>> {
        let image = match (&self.image, &self.image_base64) {
            (Some(path), _) => {
                info!(path = %path.display(), "Reading image from file");
                Some(ImageInput::Bytes(fs::read(path)?))
            }
            (None, Some(encoded)) => Some(ImageInput::Encoded(encoded.clone())),
            (None, None) => None,
        };

        Ok(ClassificationInput {
            image,
            text: self.text.clone(),
            location: None,
        })
    }
}
