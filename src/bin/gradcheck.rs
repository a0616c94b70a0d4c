use std::collections::HashMap;
use std::error::Error;
use ndarray::{array, s, Array2};
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::StandardNormal;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;
use word2vec_trainer::{cbow, gradcheck_naive, normalize_rows, skipgram, word2vec_sgd_wrapper,
    Loss, Model, UniformDataset, DEFAULT_BATCH_SIZE, DEFAULT_NEGATIVE_SAMPLES};


// this executable runs the self checks of the word2vec kernels:
// row normalization on a known matrix,
// the gradient check of skipgram and cbow with both losses,
// and prints the cost and gradients of a few fixed windows.
// treated as binary executable so it can be ran independantly from main

const TOKENS: [&str; 5] = ["a", "b", "c", "d", "e"];

fn main() -> Result<(), Box<dyn Error>> {

    tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .init();

    test_normalize_rows()?;
    test_word2vec()?;
    Ok(())
}


fn test_normalize_rows() -> Result<(), Box<dyn Error>> {

    info!("testing normalize_rows...");
    let x = normalize_rows(array![[3.0, 4.0], [1.0, 2.0]]);
    println!("{}", x);

    let golden = array![[0.6, 0.8], [0.4472136, 0.89442719]];
    let close = x.iter().zip(golden.iter()).all(|(a, b)| (a - b).abs() <= 1e-6 + 1e-5 * b.abs());
    if !close {
        return Err(format!("normalize_rows gave {} instead of {}", x, golden).into());
    }
    Ok(())
}


fn test_word2vec() -> Result<(), Box<dyn Error>> {

    let dataset = UniformDataset::new(&TOKENS)?;
    let tokens: HashMap<String, usize> = TOKENS.iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect();

    let mut rng = StdRng::seed_from_u64(9265);
    let mut dummy_vectors = normalize_rows(Array2::random_using((10, 3), StandardNormal, &mut rng));
    let neg = Loss::NegativeSampling { k: DEFAULT_NEGATIVE_SAMPLES };

    for model in [Model::SkipGram, Model::Cbow] {
        for loss in [Loss::Softmax, neg] {

            info!("==== gradient check for {} with {} ====", model, loss);
            gradcheck_naive(|vec| {
                let mut rng = StdRng::seed_from_u64(31415);
                word2vec_sgd_wrapper(model, &tokens, vec, &dataset, 5, &loss, &mut rng, DEFAULT_BATCH_SIZE)
            }, &mut dummy_vectors)?;
        }
    }

    info!("=== results ===");
    let mut rng = StdRng::seed_from_u64(31415);
    let input = dummy_vectors.slice(s![..5, ..]);
    let output = dummy_vectors.slice(s![5.., ..]);

    let results = [
        skipgram("c", 3, &["a", "b", "e", "d", "b", "c"], &tokens, input, output, &Loss::Softmax, &dataset, &mut rng)?,
        skipgram("c", 1, &["a", "b"], &tokens, input, output, &neg, &dataset, &mut rng)?,
        cbow("a", 2, &["a", "b", "c", "a"], &tokens, input, output, &Loss::Softmax, &dataset, &mut rng)?,
        cbow("a", 2, &["a", "b", "a", "c"], &tokens, input, output, &neg, &dataset, &mut rng)?,
    ];

    for window in results {
        println!("cost: {}\ngrad_in:\n{}\ngrad_out:\n{}\n", window.cost, window.grad_in, window.grad_out);
    }

    Ok(())
}
