mod error;
mod activation;
mod normalize;
mod dataset;
mod corpus;
mod loss;
mod model;
mod batch;
mod gradcheck;
mod train;
mod config;
mod pipeline;

pub use error::Word2VecError;
pub use activation::{softmax, sigmoid, sigmoid_grad};
pub use normalize::normalize_rows;
pub use dataset::{Dataset, UniformDataset};
pub use corpus::Corpus;
pub use loss::{CostAndGradient, Loss, PairGradients, DEFAULT_NEGATIVE_SAMPLES, get_negative_samples, softmax_cost_and_gradient, neg_sampling_cost_and_gradient};
pub use model::{Model, WindowGradients, skipgram, cbow};
pub use batch::{word2vec_sgd_wrapper, DEFAULT_BATCH_SIZE};
pub use gradcheck::{gradcheck_naive, gradcheck_with};
pub use train::{Sgd, Train};
pub use config::{files_handling, Config, Params, TrainParams};
pub use pipeline::Pipeline;
