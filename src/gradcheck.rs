use ndarray::prelude::*;
use tracing::{debug, info};
use crate::error::Word2VecError;

pub const H: f64 = 1e-4;
pub const TOLERANCE: f64 = 1e-4;


// f has to be deterministic, a sampling f re-seeds its rng on every call
pub fn gradcheck_naive<F>(f: F, x: &mut Array2<f64>) -> Result<(), Word2VecError>
where
    F: FnMut(&Array2<f64>) -> Result<(f64, Array2<f64>), Word2VecError>,
{
    gradcheck_with(f, x, H, TOLERANCE)
}

pub fn gradcheck_with<F>(mut f: F, x: &mut Array2<f64>, h: f64, tolerance: f64) -> Result<(), Word2VecError>
where
    F: FnMut(&Array2<f64>) -> Result<(f64, Array2<f64>), Word2VecError>,
{

    let (_, grad) = f(x)?;
    if grad.dim() != x.dim() {
        return Err(Word2VecError::ShapeMismatch(format!(
            "gradient has shape {:?} but input has shape {:?}", grad.dim(), x.dim())));
    }

    let (rows, cols) = x.dim();
    for i in 0..rows {
        for j in 0..cols {

            let old = x[[i, j]];

            x[[i, j]] = old + h;
            let plus = f(x);
            x[[i, j]] = old - h;
            let minus = f(x);
            x[[i, j]] = old;

            let numeric = (plus?.0 - minus?.0) / (2.0 * h);
            let analytic = grad[[i, j]];

            let rel_diff = (numeric - analytic).abs() / 1f64.max(numeric.abs()).max(analytic.abs());
            if !(rel_diff <= tolerance) {
                debug!("gradient check failed at ({}, {}), analytic {}, numeric {}", i, j, analytic, numeric);
                return Err(Word2VecError::GradientCheck { index: (i, j), analytic, numeric });
            }
        }
    }

    info!("gradient check passed over {} entries", rows * cols);
    Ok(())
}


#[cfg(test)]
mod tests {

    use ndarray::prelude::*;
    use crate::error::Word2VecError;
    use super::gradcheck_naive;

    #[test]
    fn quadratic_test() {

        let mut x = array![[1.0, -2.0], [0.5, 3.0]];
        let before = x.clone();
        gradcheck_naive(|x| Ok((x.mapv(|v| v * v).sum(), 2.0 * x)), &mut x).unwrap();
        assert_eq!(x, before);
    }

    #[test]
    fn wrong_gradient_test() {

        let mut x = array![[1.0, -2.0], [0.5, 3.0]];
        let res = gradcheck_naive(|x| Ok((x.mapv(|v| v * v).sum(), x.to_owned())), &mut x);
        match res {
            Err(Word2VecError::GradientCheck { index, analytic, numeric }) => {
                assert_eq!(index, (0, 0));
                assert!((analytic - 1.0).abs() < 1e-12);
                assert!((numeric - 2.0).abs() < 1e-6);
            }
            other => panic!("expected a gradient check failure, got {:?}", other)
        }
    }

    #[test]
    fn shape_mismatch_test() {

        let mut x: Array2<f64> = Array2::zeros((2, 2));
        let res = gradcheck_naive(|_| Ok((0.0, Array2::zeros((1, 2)))), &mut x);
        assert!(matches!(res, Err(Word2VecError::ShapeMismatch(_))));
    }
}
