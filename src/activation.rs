use ndarray::prelude::*;
use ndarray_stats::QuantileExt;
use crate::error::Word2VecError;


pub fn softmax(x: ArrayView1<f64>) -> Result<Array1<f64>, Word2VecError> {

    let max = *x.max().map_err(|_| Word2VecError::UndefinedSoftmax)?;
    let exps = x.mapv(|v| (v - max).exp());
    let total = exps.sum();
    Ok(exps / total)
}

pub fn sigmoid(x: ArrayView1<f64>) -> Array1<f64> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

// s is sigmoid(x)
pub fn sigmoid_grad(s: ArrayView1<f64>) -> Array1<f64> {
    s.mapv(|v| v * (1.0 - v))
}
