use std::collections::HashMap;
use std::fmt::Display;
use std::ops::AddAssign;
use ndarray::prelude::*;
use rand::Rng;
use tracing::debug;
use crate::dataset::Dataset;
use crate::error::Word2VecError;
use crate::loss::CostAndGradient;


#[derive(Clone, Debug)]
pub struct WindowGradients {
    pub cost: f64,
    pub grad_in: Array2<f64>, // shaped like the input vectors
    pub grad_out: Array2<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Model {
    SkipGram,
    Cbow,
}

impl Model {

    pub fn from_name(name: &str) -> Result<Model, Word2VecError> {
        match name {
            "skipgram" | "skip-gram" => Ok(Model::SkipGram),
            "cbow" => Ok(Model::Cbow),
            _ => Err(Word2VecError::Config(format!("unrecognized model {}", name)))
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn run<S, L, D, R>(&self,
        current_word: &str,
        c: usize,
        context_words: &[S],
        tokens: &HashMap<String, usize>,
        input_vectors: ArrayView2<f64>,
        output_vectors: ArrayView2<f64>,
        loss: &L,
        dataset: &D,
        rng: &mut R) -> Result<WindowGradients, Word2VecError>
    where
        S: AsRef<str>,
        L: CostAndGradient,
        D: Dataset,
        R: Rng + ?Sized,
    {
        match self {
            Model::SkipGram => skipgram(current_word, c, context_words, tokens, input_vectors, output_vectors, loss, dataset, rng),
            Model::Cbow => cbow(current_word, c, context_words, tokens, input_vectors, output_vectors, loss, dataset, rng)
        }
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Model::SkipGram => write!(f, "skipgram"),
            Model::Cbow => write!(f, "cbow")
        }
    }
}


fn token_index(tokens: &HashMap<String, usize>, token: &str, vocab_size: usize) -> Result<usize, Word2VecError> {

    match tokens.get(token) {
        Some(i) if *i < vocab_size => Ok(*i),
        Some(i) => Err(Word2VecError::IndexOutOfBounds { index: *i, max: vocab_size }),
        None => Err(Word2VecError::UnknownToken(token.to_owned()))
    }
}

fn check_window<S: AsRef<str>>(c: usize, context_words: &[S], input_vectors: &ArrayView2<f64>, output_vectors: &ArrayView2<f64>) -> Result<(), Word2VecError> {

    if context_words.len() > 2 * c {
        return Err(Word2VecError::ShapeMismatch(format!(
            "{} context words for a window of radius {}", context_words.len(), c)));
    }
    if input_vectors.dim().1 != output_vectors.dim().1 {
        return Err(Word2VecError::ShapeMismatch(format!(
            "input vectors have dimension {} but output vectors {}", input_vectors.dim().1, output_vectors.dim().1)));
    }
    Ok(())
}


#[allow(clippy::too_many_arguments)]
pub fn skipgram<S, L, D, R>(
    current_word: &str,
    c: usize,
    context_words: &[S],
    tokens: &HashMap<String, usize>,
    input_vectors: ArrayView2<f64>,
    output_vectors: ArrayView2<f64>,
    loss: &L,
    dataset: &D,
    rng: &mut R,
) -> Result<WindowGradients, Word2VecError>
where
    S: AsRef<str>,
    L: CostAndGradient,
    D: Dataset,
    R: Rng + ?Sized,
{

    check_window(c, context_words, &input_vectors, &output_vectors)?;

    let mut cost = 0.0;
    let mut grad_in: Array2<f64> = Array2::zeros(input_vectors.raw_dim());
    let mut grad_out: Array2<f64> = Array2::zeros(output_vectors.raw_dim());

    let center = token_index(tokens, current_word, input_vectors.dim().0)?;
    let predicted = input_vectors.slice(s![center, ..]);

    for word in context_words {
        let target = token_index(tokens, word.as_ref(), output_vectors.dim().0)?;
        let pair = loss.cost_and_gradient(predicted, target, output_vectors, dataset, rng)?;
        cost += pair.cost;
        grad_in.slice_mut(s![center, ..]).add_assign(&pair.grad_predicted);
        grad_out.add_assign(&pair.grad_output);
    }

    debug!("skipgram window around {} with {} context words, cost {}", current_word, context_words.len(), cost);
    Ok(WindowGradients { cost, grad_in, grad_out })
}


// the context vectors are summed, not averaged
#[allow(clippy::too_many_arguments)]
pub fn cbow<S, L, D, R>(
    current_word: &str,
    c: usize,
    context_words: &[S],
    tokens: &HashMap<String, usize>,
    input_vectors: ArrayView2<f64>,
    output_vectors: ArrayView2<f64>,
    loss: &L,
    dataset: &D,
    rng: &mut R,
) -> Result<WindowGradients, Word2VecError>
where
    S: AsRef<str>,
    L: CostAndGradient,
    D: Dataset,
    R: Rng + ?Sized,
{

    check_window(c, context_words, &input_vectors, &output_vectors)?;

    let mut grad_in: Array2<f64> = Array2::zeros(input_vectors.raw_dim());

    let vocab_size = input_vectors.dim().0;
    let context = context_words
    .iter()
    .map(|word| token_index(tokens, word.as_ref(), vocab_size))
    .collect::<Result<Vec<usize>, Word2VecError>>()?;

    let mut predicted: Array1<f64> = Array1::zeros(input_vectors.dim().1);
    for idx in &context {
        predicted.add_assign(&input_vectors.slice(s![*idx, ..]));
    }

    let target = token_index(tokens, current_word, output_vectors.dim().0)?;
    let pair = loss.cost_and_gradient(predicted.view(), target, output_vectors, dataset, rng)?;

    for idx in &context {
        grad_in.slice_mut(s![*idx, ..]).add_assign(&pair.grad_predicted);
    }

    debug!("cbow window around {} with {} context words, cost {}", current_word, context_words.len(), pair.cost);
    Ok(WindowGradients { cost: pair.cost, grad_in, grad_out: pair.grad_output })
}


#[cfg(test)]
mod tests {

    use std::collections::HashMap;
    use ndarray::prelude::*;
    use ndarray_rand::RandomExt;
    use ndarray_rand::rand_distr::StandardNormal;
    use rand::{rngs::StdRng, SeedableRng};
    use crate::dataset::UniformDataset;
    use crate::error::Word2VecError;
    use crate::loss::{Loss, DEFAULT_NEGATIVE_SAMPLES};
    use crate::normalize::normalize_rows;
    use super::*;

    fn dummy_tokens() -> HashMap<String, usize> {
        ["a", "b", "c", "d", "e"].iter().enumerate().map(|(i, t)| (t.to_string(), i)).collect()
    }

    fn dummy_vectors() -> Array2<f64> {
        let mut rng = StdRng::seed_from_u64(9265);
        normalize_rows(Array2::random_using((10, 3), StandardNormal, &mut rng))
    }

    #[test]
    fn skipgram_center_row_only_test() {

        let tokens = dummy_tokens();
        let vectors = dummy_vectors();
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let mut rng = StdRng::seed_from_u64(31415);

        for loss in [Loss::Softmax, Loss::NegativeSampling { k: DEFAULT_NEGATIVE_SAMPLES }] {
            let out = skipgram("c", 3, &["a", "b", "e", "d", "b", "c"], &tokens,
                vectors.slice(s![..5, ..]), vectors.slice(s![5.., ..]), &loss, &dataset, &mut rng).unwrap();

            assert!(out.cost > 0.0);
            for (i, row) in out.grad_in.axis_iter(Axis(0)).enumerate() {
                if i != 2 {
                    assert!(row.iter().all(|g| *g == 0.0));
                }
            }
            assert!(out.grad_in.row(2).iter().any(|g| *g != 0.0));
        }
    }

    #[test]
    fn skipgram_seeded_fixture_test() {

        let tokens = dummy_tokens();
        let vectors = dummy_vectors();
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let loss = Loss::NegativeSampling { k: DEFAULT_NEGATIVE_SAMPLES };

        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            skipgram("c", 1, &["a", "b"], &tokens,
                vectors.slice(s![..5, ..]), vectors.slice(s![5.., ..]), &loss, &dataset, &mut rng).unwrap()
        };
        let first = run(31415);
        let second = run(31415);
        assert_eq!(first.cost, second.cost);
        assert_eq!(first.grad_in, second.grad_in);
        assert_eq!(first.grad_out, second.grad_out);
    }

    #[test]
    fn golden_fixture_test() {

        let vectors = array![
            [0.1, 0.2, 0.3], [-0.4, 0.5, 0.1], [0.3, -0.2, 0.8], [0.0, 0.7, -0.3], [0.6, 0.1, 0.2],
            [0.2, -0.1, 0.4], [0.5, 0.5, -0.5], [-0.3, 0.2, 0.1], [0.9, -0.4, 0.0], [0.1, 0.1, 0.1]
        ];
        let tokens = dummy_tokens();
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let close = |a: f64, b: f64| (a - b).abs() < 1e-7;

        let out = skipgram("c", 3, &["a", "b", "e", "d", "b", "c"], &tokens,
            vectors.slice(s![..5, ..]), vectors.slice(s![5.., ..]), &Loss::Softmax, &dataset, &mut rng).unwrap();
        assert!(close(out.cost, 10.311586419));
        for (g, e) in out.grad_in.row(2).iter().zip([-0.043165536, -0.868682897, 0.875810779]) {
            assert!(close(*g, e));
        }
        for (g, e) in out.grad_out.row(1).iter().zip([-0.375933203, 0.250622135, -1.002488542]) {
            assert!(close(*g, e));
        }

        let out = cbow("a", 2, &["a", "b", "c", "a"], &tokens,
            vectors.slice(s![..5, ..]), vectors.slice(s![5.., ..]), &Loss::Softmax, &dataset, &mut rng).unwrap();
        assert!(close(out.cost, 1.211374200));
        for (g, e) in out.grad_in.row(0).iter().zip([0.005481648, 0.280228126, -0.595028842]) {
            assert!(close(*g, e));
        }
        for (g, e) in out.grad_out.row(0).iter().zip([-0.070221222, -0.491548555, -1.053318333]) {
            assert!(close(*g, e));
        }
    }

    #[test]
    fn skipgram_closed_form_test() {

        // zero output vectors: uniform softmax, so every context word costs ln(V)
        let tokens = dummy_tokens();
        let input = dummy_vectors().slice(s![..5, ..]).to_owned();
        let output: Array2<f64> = Array2::zeros((5, 3));
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let context = ["a", "b", "e", "d", "b", "c"];

        let out = skipgram("c", 3, &context, &tokens, input.view(), output.view(), &Loss::Softmax, &dataset, &mut rng).unwrap();

        assert!((out.cost - 6.0 * 5f64.ln()).abs() < 1e-12);
        assert!(out.grad_in.iter().all(|g| g.abs() < 1e-12));

        // each row of grad_out is (6 / V - occurrences) * v_c
        let counts = [1.0, 2.0, 1.0, 1.0, 1.0];
        for (i, row) in out.grad_out.axis_iter(Axis(0)).enumerate() {
            let coef = 6.0 / 5.0 - counts[i];
            for (g, v) in row.iter().zip(input.row(2).iter()) {
                assert!((g - coef * v).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn cbow_duplicate_context_test() {

        let tokens = dummy_tokens();
        let vectors = dummy_vectors();
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let mut rng = StdRng::seed_from_u64(31415);

        let out = cbow("a", 2, &["a", "b", "c", "a"], &tokens,
            vectors.slice(s![..5, ..]), vectors.slice(s![5.., ..]), &Loss::Softmax, &dataset, &mut rng).unwrap();

        // the summed context vector is what the kernel saw
        let predicted = &vectors.row(0) * 2.0 + &vectors.row(1) + &vectors.row(2);
        let pair = crate::loss::softmax_cost_and_gradient(predicted.view(), 0, vectors.slice(s![5.., ..])).unwrap();
        assert!((out.cost - pair.cost).abs() < 1e-12);

        for j in 0..3 {
            assert!((out.grad_in[[0, j]] - 2.0 * pair.grad_predicted[j]).abs() < 1e-12);
            assert!((out.grad_in[[1, j]] - pair.grad_predicted[j]).abs() < 1e-12);
            assert!((out.grad_in[[2, j]] - pair.grad_predicted[j]).abs() < 1e-12);
            assert_eq!(out.grad_in[[3, j]], 0.0);
            assert_eq!(out.grad_in[[4, j]], 0.0);
        }
    }

    #[test]
    fn unknown_token_test() {

        let tokens = dummy_tokens();
        let vectors = dummy_vectors();
        let dataset = UniformDataset::new(&["a", "b", "c", "d", "e"]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        let res = Model::Cbow.run("a", 1, &["a", "z"], &tokens,
            vectors.slice(s![..5, ..]), vectors.slice(s![5.., ..]), &Loss::Softmax, &dataset, &mut rng);
        assert!(matches!(res, Err(Word2VecError::UnknownToken(t)) if t == "z"));

        let res = Model::SkipGram.run("a", 1, &["a", "b", "c"], &tokens,
            vectors.slice(s![..5, ..]), vectors.slice(s![5.., ..]), &Loss::Softmax, &dataset, &mut rng);
        assert!(matches!(res, Err(Word2VecError::ShapeMismatch(_))));
    }
}
