use std::error::Error;
use tracing_subscriber::EnvFilter;
use word2vec_trainer::Pipeline;

fn main() -> Result<(), Box<dyn Error>> {

    tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

    Pipeline::run()
}
