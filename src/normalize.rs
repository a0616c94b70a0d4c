use ndarray::prelude::*;


// a row of zeros turns into NaNs
pub fn normalize_rows(mut x: Array2<f64>) -> Array2<f64> {

    for mut row in x.axis_iter_mut(Axis(0)) {
        let norm = row.dot(&row).sqrt();
        row /= norm;
    }
    x
}
