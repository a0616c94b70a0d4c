use ndarray::prelude::*;
use ndarray::Array;
use ndarray_rand::RandomExt;
use ndarray_rand::rand_distr::Uniform;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Instant;
use tracing::info;
use crate::batch::word2vec_sgd_wrapper;
use crate::config::TrainParams;
use crate::config::files_handling;
use crate::corpus::Corpus;
use crate::error::Word2VecError;

pub const ANNEAL_FACTOR: f64 = 0.5;


// plain sgd over a function returning (cost, gradient)
#[derive(Clone, Debug)]
pub struct Sgd {
    pub step: f64,
    pub iterations: usize,
    pub anneal_every: usize,
    pub print_every: usize,
    pub save_every: Option<usize>,
}

struct DisplayProgress {
    exp_cost: Option<f64>, // exponential moving average of the cost, sampled every print_every
    timer: Instant,
}

impl DisplayProgress {

    fn new() -> Self {
        Self {
            exp_cost: None,
            timer: Instant::now()
        }
    }

    fn update(&mut self, cost: f64) -> f64 {
        let exp_cost = match self.exp_cost {
            Some(prev) => 0.95 * prev + 0.05 * cost,
            None => cost
        };
        self.exp_cost = Some(exp_cost);
        exp_cost
    }
}

impl Sgd {

    pub fn from_params(params: &TrainParams) -> Sgd {
        Self {
            step: params.learning_rate,
            iterations: params.iterations,
            anneal_every: params.anneal_every,
            print_every: params.print_every,
            save_every: params.save_every,
        }
    }

    // every period is used as a divisor
    fn check_periods(&self) -> Result<(), Word2VecError> {
        if self.anneal_every == 0 || self.print_every == 0 || self.save_every == Some(0) {
            return Err(Word2VecError::Config(format!(
                "anneal_every, print_every and save_every must be positive, got {}, {} and {:?}",
                self.anneal_every, self.print_every, self.save_every)));
        }
        Ok(())
    }

    // step size in effect after `iter` iterations
    pub fn step_at(&self, iter: usize) -> Result<f64, Word2VecError> {
        self.check_periods()?;
        Ok(self.step * ANNEAL_FACTOR.powi((iter / self.anneal_every) as i32))
    }

    // runs iterations start_iter + 1 ..= iterations, x is saved as params_<iter>.npy
    // in checkpoint_dir every save_every iterations
    pub fn run<F>(&self, mut f: F, mut x: Array2<f64>, start_iter: usize, checkpoint_dir: Option<&str>) -> Result<Array2<f64>, Word2VecError>
    where
        F: FnMut(&Array2<f64>) -> Result<(f64, Array2<f64>), Word2VecError>,
    {

        let mut step = self.step_at(start_iter)?;
        let mut progress = DisplayProgress::new();

        for iter in start_iter + 1..=self.iterations {

            let (cost, grad) = f(&x)?;
            x.scaled_add(-step, &grad);

            if iter % self.print_every == 0 {
                let exp_cost = progress.update(cost);
                info!("iter {}: {}, took {} seconds so far", iter, exp_cost, progress.timer.elapsed().as_secs());
            }

            if let (Some(save_every), Some(dir)) = (self.save_every, checkpoint_dir) {
                if iter % save_every == 0 {
                    files_handling::save_output(dir, &files_handling::checkpoint_name(iter), &x)?;
                }
            }

            if iter % self.anneal_every == 0 {
                step *= ANNEAL_FACTOR;
            }
        }

        Ok(x)
    }
}


pub struct Train {
    params: Array2<f64>, // input vectors stacked over output vectors
    vocab_size: usize,
}

impl Train {

    // input vectors uniform in [-0.5, 0.5) / dim, output vectors zero
    fn new<R: Rng + ?Sized>(vocab_size: usize, embedding_dim: usize, rng: &mut R) -> Train {

        let w_input = Array::random_using((vocab_size, embedding_dim), Uniform::new(-0.5, 0.5), rng) / embedding_dim as f64;
        let w_output: Array2<f64> = Array2::zeros((vocab_size, embedding_dim));

        Self {
            params: ndarray::concatenate![Axis(0), w_input, w_output],
            vocab_size
        }
    }

    pub fn get_params(&self) -> Array2<f64> {
        self.params.clone()
    }

    // input and output vectors summed
    pub fn get_word_vectors(&self) -> Array2<f64> {
        &self.params.slice(s![..self.vocab_size, ..]) + &self.params.slice(s![self.vocab_size.., ..])
    }

    // a resumed run continues from (iteration, stacked params) with the step annealed
    // as if it had never stopped
    pub fn run(corpus: &Corpus, train_params: &TrainParams, resume: Option<(usize, Array2<f64>)>, checkpoint_dir: Option<&str>) -> Result<Train, Word2VecError> {

        let vocab_size = corpus.vocab_size();
        let dim = train_params.embedding_dim;

        let mut rng = StdRng::seed_from_u64(train_params.seed);
        let (start_iter, mut trainer) = match resume {
            Some((iter, params)) => {
                if params.dim() != (2 * vocab_size, dim) {
                    return Err(Word2VecError::ShapeMismatch(format!(
                        "checkpoint has shape {:?}, expected {:?}", params.dim(), (2 * vocab_size, dim))));
                }
                info!("resuming from iteration {}", iter);
                // a fresh stream, so a resumed run does not replay the batches it already saw
                rng = StdRng::seed_from_u64(train_params.seed.wrapping_add(iter as u64));
                (iter, Train { params, vocab_size })
            },
            None => (0, Train::new(vocab_size, dim, &mut rng))
        };

        let model = train_params.model;
        let loss = train_params.loss;
        let window_size = train_params.window_size;
        let batch_size = train_params.batch_size;
        let tokens = corpus.tokens();

        let sgd = Sgd::from_params(train_params);
        let timer = Instant::now();
        trainer.params = sgd.run(|x| {
            word2vec_sgd_wrapper(model, tokens, x, corpus, window_size, &loss, &mut rng, batch_size)
        }, trainer.params, start_iter, checkpoint_dir)?;

        info!("finished {} iterations of {} with {}, took {} seconds", train_params.iterations - start_iter.min(train_params.iterations), model, loss, timer.elapsed().as_secs());
        Ok(trainer)
    }
}
