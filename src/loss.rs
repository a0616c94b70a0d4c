use std::fmt::Display;
use std::ops::AddAssign;
use ndarray::prelude::*;
use rand::Rng;
use crate::activation::{sigmoid, softmax};
use crate::dataset::Dataset;
use crate::error::Word2VecError;

pub const DEFAULT_NEGATIVE_SAMPLES: usize = 10;


#[derive(Clone, Debug)]
pub struct PairGradients {
    pub cost: f64,
    pub grad_predicted: Array1<f64>,
    pub grad_output: Array2<f64>, // (V, d)
}

pub trait CostAndGradient {
    fn cost_and_gradient<D: Dataset, R: Rng + ?Sized>(
        &self,
        predicted: ArrayView1<f64>,
        target: usize,
        output_vectors: ArrayView2<f64>,
        dataset: &D,
        rng: &mut R,
    ) -> Result<PairGradients, Word2VecError>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Loss {
    Softmax,
    NegativeSampling { k: usize },
}

impl Loss {

    pub fn from_name(name: &str, k: usize) -> Result<Loss, Word2VecError> {
        match name {
            "softmax" => Ok(Loss::Softmax),
            "negative_sampling" | "neg_sampling" => Ok(Loss::NegativeSampling { k }),
            _ => Err(Word2VecError::Config(format!("unrecognized loss {}", name)))
        }
    }
}

impl Display for Loss {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Loss::Softmax => write!(f, "softmax"),
            Loss::NegativeSampling { k } => write!(f, "negative_sampling (k = {})", k)
        }
    }
}

impl CostAndGradient for Loss {
    fn cost_and_gradient<D: Dataset, R: Rng + ?Sized>(
        &self,
        predicted: ArrayView1<f64>,
        target: usize,
        output_vectors: ArrayView2<f64>,
        dataset: &D,
        rng: &mut R,
    ) -> Result<PairGradients, Word2VecError> {
        match self {
            Loss::Softmax => softmax_cost_and_gradient(predicted, target, output_vectors),
            Loss::NegativeSampling { k } => neg_sampling_cost_and_gradient(predicted, target, output_vectors, dataset, rng, *k)
        }
    }
}


fn check_pair(predicted: &ArrayView1<f64>, target: usize, output_vectors: &ArrayView2<f64>) -> Result<(), Word2VecError> {

    let (vocab_size, dim) = output_vectors.dim();
    if predicted.len() != dim {
        return Err(Word2VecError::ShapeMismatch(format!(
            "predicted vector has length {} but output vectors have dimension {}", predicted.len(), dim)));
    }
    if target >= vocab_size {
        return Err(Word2VecError::IndexOutOfBounds { index: target, max: vocab_size });
    }
    Ok(())
}

// (n,) x (d,) => (n, d)
fn outer(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array2<f64> {
    a.insert_axis(Axis(1)).dot(&b.insert_axis(Axis(0)))
}


// y = softmax(U p), cost -ln y[target], gradients U^T (y - e_target) and (y - e_target) p^T
pub fn softmax_cost_and_gradient(
    predicted: ArrayView1<f64>,
    target: usize,
    output_vectors: ArrayView2<f64>,
) -> Result<PairGradients, Word2VecError> {

    check_pair(&predicted, target, &output_vectors)?;

    let scores: Array1<f64> = output_vectors.dot(&predicted);
    let mut y_hat = softmax(scores.view())?;
    let cost = -y_hat[target].ln();

    // y_hat becomes the score error y - e_target
    y_hat[target] -= 1.0;

    let grad_predicted = output_vectors.t().dot(&y_hat);
    let grad_output = outer(y_hat.view(), predicted);

    Ok(PairGradients { cost, grad_predicted, grad_output })
}


// duplicates are kept, never returns if the dataset can only produce target
pub fn get_negative_samples<D: Dataset, R: Rng + ?Sized>(target: usize, dataset: &D, rng: &mut R, k: usize) -> Vec<usize> {

    (0..k).map(|_| {
        loop {
            let idx = dataset.sample_token_idx(rng);
            if idx != target {
                break idx
            }
        }
    }).collect()
}


pub fn neg_sampling_cost_and_gradient<D: Dataset, R: Rng + ?Sized>(
    predicted: ArrayView1<f64>,
    target: usize,
    output_vectors: ArrayView2<f64>,
    dataset: &D,
    rng: &mut R,
    k: usize,
) -> Result<PairGradients, Word2VecError> {

    check_pair(&predicted, target, &output_vectors)?;

    let vocab_size = output_vectors.dim().0;
    let mut indices = vec![target];
    indices.extend(get_negative_samples(target, dataset, rng, k));
    if let Some(idx) = indices.iter().find(|idx| **idx >= vocab_size) {
        return Err(Word2VecError::IndexOutOfBounds { index: *idx, max: vocab_size });
    }

    // (k+1, d), first row is the target
    let sampled_vectors: Array2<f64> = output_vectors.select(Axis(0), &indices);
    let mut y_hat = sigmoid(sampled_vectors.dot(&predicted).view());

    let cost = -y_hat[0].ln() - y_hat.slice(s![1..]).mapv(|s| (1.0 - s).ln()).sum();

    y_hat[0] -= 1.0;
    let grad_predicted = sampled_vectors.t().dot(&y_hat);
    let sampled_grad = outer(y_hat.view(), predicted);

    // a negative may be drawn more than once, so rows are accumulated, not assigned
    let mut grad_output: Array2<f64> = Array2::zeros(output_vectors.raw_dim());
    for (row, idx) in indices.iter().enumerate() {
        grad_output.slice_mut(s![*idx, ..]).add_assign(&sampled_grad.slice(s![row, ..]));
    }

    Ok(PairGradients { cost, grad_predicted, grad_output })
}
