use rand::Rng;
use crate::error::Word2VecError;


// all randomness comes from the caller's rng, so a seeded run can be replayed
pub trait Dataset {
    fn sample_token_idx<R: Rng + ?Sized>(&self, rng: &mut R) -> usize;
    fn random_context<R: Rng + ?Sized>(&self, radius: usize, rng: &mut R) -> (String, Vec<String>);
}

// every draw is uniform, context tokens may repeat or equal the center
pub struct UniformDataset {
    tokens: Vec<String>,
}

impl UniformDataset {

    pub fn new(tokens: &[&str]) -> Result<UniformDataset, Word2VecError> {
        if tokens.is_empty() {
            return Err(Word2VecError::Corpus("a uniform dataset needs at least one token".to_string()));
        }
        Ok(Self {
            tokens: tokens.iter().map(|t| t.to_string()).collect()
        })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl Dataset for UniformDataset {

    fn sample_token_idx<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.tokens.len())
    }

    fn random_context<R: Rng + ?Sized>(&self, radius: usize, rng: &mut R) -> (String, Vec<String>) {
        let n = self.tokens.len();
        let center = self.tokens[rng.gen_range(0..n)].to_owned();
        let context = (0..2 * radius)
        .map(|_| self.tokens[rng.gen_range(0..n)].to_owned())
        .collect::<Vec<String>>();
        (center, context)
    }
}
