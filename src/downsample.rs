// Largest-Triangle-Three-Buckets downsampling.
// ref: Sveinn Steinarsson, "Downsampling Time Series for Visual Representation" (2013)

/// Reduce `data` to `threshold` points, keeping its visual shape.
///
/// Returns the input unchanged when `threshold >= data.len()` or `threshold < 3`;
/// otherwise exactly `threshold` points, always including the first and last.
/// A missing coordinate counts as 0 in the area and centroid computations.
pub fn downsample_lttb<T, X, Y>(data: &[T], threshold: usize, x: X, y: Y) -> Vec<T>
where
    T: Clone,
    X: Fn(&T) -> Option<f64>,
    Y: Fn(&T) -> Option<f64>,
{
    let n = data.len();
    if threshold >= n || threshold < 3 {
        return data.to_vec();
    }

    let xy = |p: &T| (x(p).unwrap_or(0.0), y(p).unwrap_or(0.0));
    // Interior buckets of size (n - 2) / (threshold - 2); floor(i * size) + 1, in integers.
    let bucket_bound = |i: usize| (i * (n - 2) / (threshold - 2) + 1).min(n);

    let mut sampled = Vec::with_capacity(threshold);
    sampled.push(data[0].clone());
    let mut selected = 0usize;

    for i in 0..threshold - 2 {
        // Centroid of the next bucket; for the last bucket this is the final point.
        let next_start = bucket_bound(i + 1);
        let next_end = bucket_bound(i + 2);
        let next = &data[next_start..next_end];
        let (sum_x, sum_y) = next.iter().map(&xy).fold((0.0, 0.0), |(sx, sy), (px, py)| {
            (sx + px, sy + py)
        });
        let len = next.len() as f64;
        let (avg_x, avg_y) = (sum_x / len, sum_y / len);

        let start = bucket_bound(i);
        let end = next_start;
        let (ax, ay) = xy(&data[selected]);

        let mut max_area = -1.0;
        let mut chosen = start;
        for (j, p) in data[start..end].iter().enumerate() {
            let (bx, by) = xy(p);
            let area = ((ax - avg_x) * (by - ay) - (ax - bx) * (avg_y - ay)).abs();
            if area > max_area {
                max_area = area;
                chosen = start + j;
            }
        }

        sampled.push(data[chosen].clone());
        selected = chosen;
    }

    sampled.push(data[n - 1].clone());
    sampled
}
