use std::fmt::Display;
use std::fs;
use serde_json::Value;
use crate::error::Word2VecError;
use crate::loss::{Loss, DEFAULT_NEGATIVE_SAMPLES};
use crate::model::Model;

#[derive(Clone, Debug, PartialEq)]
pub struct TrainParams {
    pub model: Model,
    pub loss: Loss,
    pub embedding_dim: usize,
    pub window_size: usize,
    pub learning_rate: f64,
    pub iterations: usize,
    pub batch_size: usize,
    pub anneal_every: usize,
    pub print_every: usize,
    pub save_every: Option<usize>,
    pub seed: u64,
}

impl Default for TrainParams {
    fn default() -> Self {
        Self {
            model: Model::SkipGram,
            loss: Loss::NegativeSampling { k: DEFAULT_NEGATIVE_SAMPLES },
            embedding_dim: 10,
            window_size: 5,
            learning_rate: 0.3,
            iterations: 40000,
            batch_size: 50,
            anneal_every: 20000,
            print_every: 10,
            save_every: None,
            seed: 31415,
        }
    }
}

impl Display for TrainParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "training hyper parameters:
        model: {},
        loss: {},
        embedding_dim: {},
        window_size: {},
        learning_rate: {},
        iterations: {},
        batch_size: {},
        anneal_every: {},
        print_every: {},
        save_every: {:?},
        seed: {}",
        self.model, self.loss, self.embedding_dim, self.window_size, self.learning_rate, self.iterations,
        self.batch_size, self.anneal_every, self.print_every, self.save_every, self.seed
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Params {
    pub corpus_file: String,
    pub output_dir: String,
    pub resume: bool,
    pub train: TrainParams,
}

impl Display for Params {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "using hyper-params:
        corpus_file: {}
        output_dir: {}
        resume: {}
        Using {}",
        self.corpus_file, self.output_dir, self.resume, self.train)
    }
}

pub struct Config {
    params: Params
}

impl Config {

    pub fn get_params(&self) -> Params {
        self.params.clone()
    }

    pub fn new(args: &[String]) -> Result<Config, Word2VecError> {

        if args.len() != 2 {
            return Err(Word2VecError::Config("input should be a path to json file only".to_string()));
        }

        let f = fs::File::open(&args[1])?;
        let json: Value = serde_json::from_reader(f)?;
        Config::from_json(&json)
    }

    pub fn from_json(json: &Value) -> Result<Config, Word2VecError> {

        let defaults = TrainParams::default();

        // input and output are required
        let corpus_file = get_str(json, "corpus_file")?
        .ok_or_else(|| Word2VecError::Config("corpus_file was not supplied through json".to_string()))?;
        let output_dir = get_str(json, "output_dir")?
        .ok_or_else(|| Word2VecError::Config("output_dir was not supplied through json".to_string()))?;

        // handle default vs input parameters
        let model = match get_str(json, "model")? {
            Some(name) => Model::from_name(&name)?,
            None => defaults.model
        };
        let negative_samples = get_usize(json, "negative_samples")?.unwrap_or(DEFAULT_NEGATIVE_SAMPLES);
        let loss = match get_str(json, "loss")? {
            Some(name) => Loss::from_name(&name, negative_samples)?,
            None => Loss::NegativeSampling { k: negative_samples }
        };

        let train = TrainParams {
            model,
            loss,
            embedding_dim: get_usize(json, "embedding_dim")?.unwrap_or(defaults.embedding_dim),
            window_size: get_usize(json, "window_size")?.unwrap_or(defaults.window_size),
            learning_rate: get_f64(json, "learning_rate")?.unwrap_or(defaults.learning_rate),
            iterations: get_usize(json, "iterations")?.unwrap_or(defaults.iterations),
            batch_size: get_usize(json, "batch_size")?.unwrap_or(defaults.batch_size),
            anneal_every: get_usize(json, "anneal_every")?.unwrap_or(defaults.anneal_every),
            print_every: get_usize(json, "print_every")?.unwrap_or(defaults.print_every),
            save_every: get_usize(json, "save_every")?,
            seed: get_usize(json, "seed")?.map_or(defaults.seed, |s| s as u64),
        };

        for (name, value) in [("embedding_dim", train.embedding_dim), ("window_size", train.window_size),
            ("batch_size", train.batch_size), ("anneal_every", train.anneal_every), ("print_every", train.print_every)] {
            if value == 0 {
                return Err(Word2VecError::Config(format!("{} must be positive", name)));
            }
        }
        if train.save_every == Some(0) {
            return Err(Word2VecError::Config("save_every must be positive".to_string()));
        }

        let params = Params {
            corpus_file,
            output_dir,
            resume: get_bool(json, "resume")?.unwrap_or(false),
            train,
        };

        Ok (
            Self {
                params
            }
        )
    }

}

fn get_str(json: &Value, key: &str) -> Result<Option<String>, Word2VecError> {
    match json.get(key) {
        Some(v) => v.as_str()
            .map(|s| Some(s.to_owned()))
            .ok_or_else(|| Word2VecError::Config(format!("given {} is not a string", key))),
        None => Ok(None)
    }
}

fn get_usize(json: &Value, key: &str) -> Result<Option<usize>, Word2VecError> {
    match json.get(key) {
        Some(v) => v.as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| Word2VecError::Config(format!("given {} is not a non-negative integer", key))),
        None => Ok(None)
    }
}

fn get_f64(json: &Value, key: &str) -> Result<Option<f64>, Word2VecError> {
    match json.get(key) {
        Some(v) => v.as_f64()
            .map(Some)
            .ok_or_else(|| Word2VecError::Config(format!("given {} is not numeric", key))),
        None => Ok(None)
    }
}

fn get_bool(json: &Value, key: &str) -> Result<Option<bool>, Word2VecError> {
    match json.get(key) {
        Some(v) => v.as_bool()
            .map(Some)
            .ok_or_else(|| Word2VecError::Config(format!("given {} is not boolean", key))),
        None => Ok(None)
    }
}


pub mod files_handling {

    use std::collections::HashMap;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter};
    use std::path::Path;
    use ndarray::Array2;
    use ndarray_npy::{read_npy, write_npy};
    use crate::error::Word2VecError;

    pub fn read_input<R: ReadFile>(file_path: &str) -> Result<R, Word2VecError> {
        R::read_file(file_path)
    }

    pub fn save_output<S: SaveFile>(output_dir: &str, file_name: &str, item: &S) -> Result<(), Word2VecError> {

        // create output folder
        fs::create_dir_all(output_dir)?;

        // SaveFile can be Array2<f64> or HashMap<String, usize>
        item.save_file(output_dir, file_name)
    }

    pub fn last_checkpoint(output_dir: &str) -> Result<Option<usize>, Word2VecError> {

        if !Path::new(output_dir).is_dir() {
            return Ok(None);
        }

        let mut last = None;
        for entry in fs::read_dir(output_dir)? {
            let name = entry?.file_name().to_string_lossy().to_string();
            let iter = name
            .strip_prefix("params_")
            .and_then(|rest| rest.strip_suffix(".npy"))
            .and_then(|n| n.parse::<usize>().ok());
            if let Some(iter) = iter {
                last = last.max(Some(iter));
            }
        }
        Ok(last)
    }

    pub fn checkpoint_name(iter: usize) -> String {
        format!("params_{}", iter)
    }

    pub trait ReadFile: Sized {
        fn read_file(file_path: &str) -> Result<Self, Word2VecError>;
    }

    impl ReadFile for Array2<f64> {
        fn read_file(file_path: &str) -> Result<Self, Word2VecError> {
            let in_file = file_path.to_string() + ".npy";
            let item = read_npy(in_file)?;
            Ok(item)
        }
    }

    impl ReadFile for HashMap<String, usize> {
        fn read_file(file_path: &str) -> Result<Self, Word2VecError> {
            let in_file = file_path.to_string() + ".txt";
            let f = BufReader::new(File::open(in_file)?);
            let item = serde_json::from_reader(f)?;
            Ok(item)
        }
    }

    pub trait SaveFile {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), Word2VecError>;
    }

    impl SaveFile for Array2<f64> {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), Word2VecError> {
            let out = output_dir.to_string() + "/" + file_name + ".npy";
            write_npy(out, self)?;
            Ok(())
        }
    }

    impl SaveFile for HashMap<String, usize> {
        fn save_file(&self, output_dir: &str, file_name: &str) -> Result<(), Word2VecError> {
            let out = output_dir.to_string() + "/" + file_name + ".txt";
            let f = BufWriter::new(File::create(out)?);
            serde_json::to_writer(f, self)?;
            Ok(())
        }
    }
}
