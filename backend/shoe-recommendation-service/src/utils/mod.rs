// Utility functions for shoe-recommendation-service

/// Logistic function
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Numerically stable `ln(1 + e^x)`
pub fn softplus(x: f32) -> f32 {
    if x > 0.0 {
        x + (-x).exp().ln_1p()
    } else {
        x.exp().ln_1p()
    }
}

/// Binary cross-entropy of a raw logit against a 0/1 label
pub fn logistic_loss(logit: f32, label: f32) -> f32 {
    if label > 0.5 {
        softplus(-logit)
    } else {
        softplus(logit)
    }
}

/// Trim and lower-case a raw attribute value. Empty values yield `None`.
pub fn normalize_token(raw: &str) -> Option<String> {
    let value = raw.trim().to_lowercase();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
