use std::collections::HashMap;
use std::ops::AddAssign;
use ndarray::prelude::*;
use rand::Rng;
use tracing::debug;
use crate::dataset::Dataset;
use crate::error::Word2VecError;
use crate::loss::CostAndGradient;
use crate::model::Model;

pub const DEFAULT_BATCH_SIZE: usize = 50;


// word_vectors stacks the input vectors over the output vectors, the gradient has the same layout
#[allow(clippy::too_many_arguments)]
pub fn word2vec_sgd_wrapper<L, D, R>(
    model: Model,
    tokens: &HashMap<String, usize>,
    word_vectors: &Array2<f64>,
    dataset: &D,
    c: usize,
    loss: &L,
    rng: &mut R,
    batch_size: usize,
) -> Result<(f64, Array2<f64>), Word2VecError>
where
    L: CostAndGradient,
    D: Dataset,
    R: Rng + ?Sized,
{

    let n = word_vectors.dim().0;
    if n % 2 != 0 {
        return Err(Word2VecError::ShapeMismatch(format!(
            "word vectors need an even number of rows to split into input and output halves, got {}", n)));
    }
    if c == 0 || batch_size == 0 {
        return Err(Word2VecError::Config(format!(
            "window size and batch size must be positive, got {} and {}", c, batch_size)));
    }

    let input_vectors = word_vectors.slice(s![..n / 2, ..]);
    let output_vectors = word_vectors.slice(s![n / 2.., ..]);

    let mut cost = 0.0;
    let mut grad: Array2<f64> = Array2::zeros(word_vectors.raw_dim());
    let denom = batch_size as f64;

    for _ in 0..batch_size {

        let c1 = rng.gen_range(1..=c);
        let (center, context) = dataset.random_context(c1, rng);

        let window = model.run(&center, c1, &context[..], tokens, input_vectors, output_vectors, loss, dataset, rng)?;

        cost += window.cost / denom;
        grad.slice_mut(s![..n / 2, ..]).add_assign(&(window.grad_in / denom));
        grad.slice_mut(s![n / 2.., ..]).add_assign(&(window.grad_out / denom));
    }

    debug!("{} batch of {} windows, cost {}", model, batch_size, cost);
    Ok((cost, grad))
}


#[cfg(test)]
mod tests {

    use std::collections::HashMap;
    use ndarray::prelude::*;
    use ndarray_rand::RandomExt;
    use ndarray_rand::rand_distr::StandardNormal;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use crate::dataset::{Dataset, UniformDataset};
    use crate::error::Word2VecError;
    use crate::gradcheck::gradcheck_naive;
    use crate::loss::{Loss, DEFAULT_NEGATIVE_SAMPLES};
    use crate::model::Model;
    use crate::normalize::normalize_rows;
    use super::{word2vec_sgd_wrapper, DEFAULT_BATCH_SIZE};

    fn dummy_tokens() -> HashMap<String, usize> {
        ["a", "b", "c", "d", "e"].iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect()
    }

    fn dummy_vectors() -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(9265);
        normalize_rows(Array2::random_using((10, 3), StandardNormal, &mut rng))
    }

    fn check(model: Model, loss: Loss) {

        let tokens = dummy_tokens();
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let mut vectors = dummy_vectors();

        // same seed on every evaluation so the batch is identical
        gradcheck_naive(|vec| {
            let mut rng = StdRng::seed_from_u64(31415);
            word2vec_sgd_wrapper(model, &tokens, vec, &dataset, 5, &loss, &mut rng, DEFAULT_BATCH_SIZE)
        }, &mut vectors).unwrap();
    }

    #[test]
    fn skipgram_softmax_gradcheck_test() {
        check(Model::SkipGram, Loss::Softmax);
    }

    #[test]
    fn skipgram_neg_sampling_gradcheck_test() {
        check(Model::SkipGram, Loss::NegativeSampling { k: DEFAULT_NEGATIVE_SAMPLES });
    }

    #[test]
    fn cbow_softmax_gradcheck_test() {
        check(Model::Cbow, Loss::Softmax);
    }

    #[test]
    fn cbow_neg_sampling_gradcheck_test() {
        check(Model::Cbow, Loss::NegativeSampling { k: DEFAULT_NEGATIVE_SAMPLES });
    }

    #[test]
    fn batch_average_test() {

        let tokens = dummy_tokens();
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let vectors = dummy_vectors();
        let loss = Loss::NegativeSampling { k: 3 };
        let batch_size = 7;

        let mut rng = StdRng::seed_from_u64(2718);
        let (cost, grad) = word2vec_sgd_wrapper(Model::SkipGram, &tokens, &vectors, &dataset, 3, &loss, &mut rng, batch_size).unwrap();

        // replay the same draws one example at a time
        let mut rng = StdRng::seed_from_u64(2718);
        let mut costs = Vec::new();
        let mut grads = Vec::new();
        for _ in 0..batch_size {
            let c1 = rng.gen_range(1..=3);
            let (center, context) = dataset.random_context(c1, &mut rng);
            let window = Model::SkipGram.run(&center, c1, &context[..], &tokens,
                vectors.slice(s![..5, ..]), vectors.slice(s![5.., ..]), &loss, &dataset, &mut rng).unwrap();
            costs.push(window.cost);
            grads.push(ndarray::concatenate![Axis(0), window.grad_in, window.grad_out]);
        }

        let mean_cost = costs.iter().sum::<f64>() / batch_size as f64;
        let mean_grad = grads.iter().fold(Array2::<f64>::zeros((10, 3)), |acc, g| acc + g) / batch_size as f64;

        assert!((cost - mean_cost).abs() < 1e-12);
        for (a, b) in grad.iter().zip(mean_grad.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn odd_rows_test() {

        let tokens = dummy_tokens();
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let vectors: Array2<f64> = Array2::zeros((9, 3));
        let mut rng = StdRng::seed_from_u64(0);
        let res = word2vec_sgd_wrapper(Model::SkipGram, &tokens, &vectors, &dataset, 5, &Loss::Softmax, &mut rng, 10);
        assert!(matches!(res, Err(Word2VecError::ShapeMismatch(_))));
    }
}
