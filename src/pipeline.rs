// imports
use crate::config::{files_handling, Config};
use crate::corpus::Corpus;
use crate::train::Train;

use std::env;
use std::error::Error;
use std::time::Instant;
use ndarray::Array2;
use tracing::info;

pub struct Pipeline {}

impl Pipeline {

    // runs the main procedure of 3 steps -
    // -> configuration of arguments
    // -> corpus loading
    // -> training, then saving the vectors and the vocabulary

    pub fn run() -> Result<(), Box<dyn Error>> {

        info!("entering program...");
        let args: Vec<String> = env::args().collect();

        info!("building parameters...");
        let params = Config::new(&args)?.get_params();
        info!("{}", params);

        let timer = Instant::now();
        let corpus = Corpus::from_file(&params.corpus_file)?;
        info!("loaded corpus, took {} seconds ...", timer.elapsed().as_secs());

        // pick up the latest checkpoint if asked to and one exists
        let resume = match (params.resume, files_handling::last_checkpoint(&params.output_dir)?) {
            (true, Some(iter)) => {
                let path = format!("{}/{}", params.output_dir, files_handling::checkpoint_name(iter));
                Some((iter, files_handling::read_input::<Array2<f64>>(&path)?))
            },
            _ => None
        };

        let timer = Instant::now();
        info!("starting training part...");
        let trainer = Train::run(&corpus, &params.train, resume, Some(&params.output_dir))?;

        // save the weights and the tokens they belong to
        files_handling::save_output(&params.output_dir, "vecs", &trainer.get_word_vectors())?;
        files_handling::save_output(&params.output_dir, "words", corpus.tokens())?;

        info!("finished training, saved vecs. Took {} seconds ...", timer.elapsed().as_secs());
        Ok(())
    }

}
