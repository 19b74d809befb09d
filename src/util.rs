pub fn mean<I>(data: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = data
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    match count {
        positive if positive > 0 => Some(sum / count as f64),
        _ => None,
    }
}

pub fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;

    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean([10., 20., 30., 15., 22.]), Some(19.4));
        assert_eq!(mean([15., 7., 55., 12., 4.]), Some(18.6));
    }

    #[test]
    fn test_mean_single_value() {
        assert_eq!(mean([42.0]), Some(42.0));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(std::iter::empty()), None);
    }

    #[test]
    fn test_mean_mixed_values() {
        assert_eq!(mean([-10.0, 0.0, 10.0]), Some(0.0));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance((0.0, 0.0), (3.0, 4.0)), 5.0);
        assert_eq!(distance((1.0, 1.0), (1.0, 1.0)), 0.0);
        assert_eq!(distance((-3.0, 0.0), (0.0, -4.0)), 5.0);
    }
}
