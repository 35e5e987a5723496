use argminmax::ArgMinMax;

/// Evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n).map(|i| start + step * i as f64).collect()
        }
    }
}

/// (min, max) of a non-empty slice
pub fn get_min_max(vec: &[f64]) -> (f64, f64) {
    let (min_index, max_index) = vec.argminmax();
    (vec[min_index], vec[max_index])
}

/// Index of the largest value, `None` when empty.
pub fn argmax(vec: &[f64]) -> Option<usize> {
    if vec.is_empty() {
        None
    } else {
        Some(vec.argmax())
    }
}

/// Trapezoidal integral of `ys` sampled at `xs`.
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    xs.windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (x[1] - x[0]) * (y[0] + y[1]) / 2.0)
        .sum()
}
