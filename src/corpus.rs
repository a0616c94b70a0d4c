use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use tracing::info;
use crate::dataset::Dataset;
use crate::error::Word2VecError;

pub const SAMPLING_POWER: f64 = 0.75;


// token ids follow the order of first appearance
pub struct Corpus {
    sentences: Vec<Vec<usize>>,
    // sentences with at least two distinct tokens, the only ones a context can come from
    usable: Vec<usize>,
    t2i: HashMap<String, usize>,
    i2t: Vec<String>,
    counts: Vec<usize>,
    sampler: WeightedIndex<f64>,
}

impl Corpus {

    pub fn from_file(file_path: &str) -> Result<Corpus, Word2VecError> {

        let f = File::open(file_path)?;
        let lines = BufReader::new(f).lines().collect::<io::Result<Vec<String>>>()?;
        let corpus = Corpus::from_lines(lines)?;
        info!("loaded corpus {}: {} sentences, {} tokens in vocabulary", file_path, corpus.sentences.len(), corpus.vocab_size());
        Ok(corpus)
    }

    pub fn from_lines<I, S>(lines: I) -> Result<Corpus, Word2VecError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {

        let mut t2i: HashMap<String, usize> = HashMap::new();
        let mut i2t: Vec<String> = Vec::new();
        let mut counts: Vec<usize> = Vec::new();
        let mut sentences: Vec<Vec<usize>> = Vec::new();

        for line in lines {

            let sequence = Corpus::parse_line(line.as_ref());
            let split_sequence = Corpus::tokenize(&sequence);
            if split_sequence.is_empty() {
                continue;
            }

            let sentence = split_sequence.into_iter().map(|tok| {
                let i = *t2i.entry(tok.to_owned()).or_insert_with(|| {
                    i2t.push(tok);
                    counts.push(0);
                    i2t.len() - 1
                });
                counts[i] += 1;
                i
            }).collect::<Vec<usize>>();

            sentences.push(sentence);
        }

        let usable = sentences
        .iter()
        .enumerate()
        .filter(|(_, sentence)| sentence.iter().any(|i| *i != sentence[0]))
        .map(|(k, _)| k)
        .collect::<Vec<usize>>();

        if usable.is_empty() {
            return Err(Word2VecError::Corpus("no sentence has two distinct tokens to build a context from".to_string()));
        }

        let weights = counts.iter().map(|c| (*c as f64).powf(SAMPLING_POWER)).collect::<Vec<f64>>();
        let sampler = WeightedIndex::new(&weights).map_err(|e| Word2VecError::Corpus(e.to_string()))?;

        Ok(Self { sentences, usable, t2i, i2t, counts, sampler })
    }

    // line is trimmed and lower cased
    fn parse_line(line: &str) -> String {
        line.trim().to_lowercase()
    }

    pub fn tokens(&self) -> &HashMap<String, usize> {
        &self.t2i
    }

    pub fn words(&self) -> &[String] {
        &self.i2t
    }

    pub fn vocab_size(&self) -> usize {
        self.i2t.len()
    }

    pub fn num_sentences(&self) -> usize {
        self.sentences.len()
    }

    pub fn count(&self, token: &str) -> usize {
        self.t2i.get(token).map_or(0, |i| self.counts[*i])
    }
}

impl Dataset for Corpus {

    // unigram^0.75 distribution
    fn sample_token_idx<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.sampler.sample(rng)
    }

    // other occurrences of the center word are dropped, an empty context is redrawn
    fn random_context<R: Rng + ?Sized>(&self, radius: usize, rng: &mut R) -> (String, Vec<String>) {

        loop {
            let sentence = &self.sentences[self.usable[rng.gen_range(0..self.usable.len())]];
            let n = sentence.len();
            let pos = rng.gen_range(0..n);
            let center = sentence[pos];

            let left = pos.saturating_sub(radius);
            let right = (pos + radius + 1).min(n);
            let context = sentence[left..pos]
            .iter()
            .chain(sentence[pos + 1..right].iter())
            .filter(|i| **i != center)
            .map(|i| self.i2t[*i].to_owned())
            .collect::<Vec<String>>();

            if !context.is_empty() {
                return (self.i2t[center].to_owned(), context)
            }
        }
    }
}


// defines the behavior needed for tokenizing a corpus
trait Tokenizer {
    fn tokenize(sequence: &str) -> Vec<String>;
}

impl Tokenizer for Corpus {
    // split on any whitespace, runs of spaces do not produce empty tokens
    fn tokenize(sequence: &str) -> Vec<String> {
        sequence.split_whitespace().map(|x| x.to_string()).collect()
    }
}
