// ==========================================
// 库存差异分析 - 数值工具
// ==========================================
// 口径与报表一致: 均值/中位数/分位数（线性插值）/样本方差
// ==========================================

/// 四舍五入到指定小数位（结果为 0 时统一为 +0.0）
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// 均值（空序列为 0）
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 升序排序副本
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(|a, b| a.total_cmp(b));
    v
}

/// 中位数（空序列为 0）
pub fn median(values: &[f64]) -> f64 {
    percentile(&sorted(values), 0.5)
}

/// 分位数, q ∈ [0, 1], 输入须已升序
///
/// 线性插值: pos = q * (n - 1)
pub fn percentile(sorted_values: &[f64], q: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return 0.0;
    }
    let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted_values[lower] + (sorted_values[upper] - sorted_values[lower]) * frac
}

/// 样本方差（n - 1）, n < 2 时为 0
pub fn sample_variance(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// 校正偏度（G1）, n < 3 或方差为 0 时为 0
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 3 {
        return 0.0;
    }
    let m = mean(values);
    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
    let m3 = values.iter().map(|v| (v - m).powi(3)).sum::<f64>() / n;
    if m2 == 0.0 {
        return 0.0;
    }
    let g1 = m3 / m2.powf(1.5);
    g1 * (n * (n - 1.0)).sqrt() / (n - 2.0)
}

/// 校正超额峰度（G2）, n < 4 或方差为 0 时为 0
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if values.len() < 4 {
        return 0.0;
    }
    let m = mean(values);
    let m2 = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
    let m4 = values.iter().map(|v| (v - m).powi(4)).sum::<f64>() / n;
    if m2 == 0.0 {
        return 0.0;
    }
    let g2 = m4 / (m2 * m2) - 3.0;
    ((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.23456, 2), 1.23);
        assert_eq!(round_to(2.0 / 3.0, 3), 0.667);
        assert_eq!(round_to(-2.005, 0), -2.0);
        // 负数舍入为零时不保留符号
        assert!(round_to(-0.004, 2).is_sign_positive());
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_percentile_linear() {
        let v = sorted(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(approx(percentile(&v, 0.25), 2.0));
        assert!(approx(percentile(&v, 0.1), 1.4));
        assert!(approx(percentile(&v, 1.0), 5.0));
    }

    #[test]
    fn test_variance_and_moments() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!(approx(sample_variance(&v), 32.0 / 7.0));
        // 对称分布偏度为 0
        assert!(approx(skewness(&[1.0, 2.0, 3.0, 4.0, 5.0]), 0.0));
        // 均匀分布 1..5 的校正超额峰度为 -1.2
        assert!(approx(kurtosis(&[1.0, 2.0, 3.0, 4.0, 5.0]), -1.2));
        assert_eq!(kurtosis(&[1.0, 1.0, 1.0, 1.0]), 0.0);
    }
}
