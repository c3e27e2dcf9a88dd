use rust_decimal::Decimal;

/// 금액 소수점 자리수 (NUMERIC(12,2))
pub const AMOUNT_SCALE: u32 = 2;

/// 금액 최대값 (NUMERIC(12,2) 범위 내)
pub fn max_amount() -> Decimal {
    Decimal::new(9_999_999_999_99, AMOUNT_SCALE)
}

/// 금액 검증: 0보다 크고, 소수점 2자리 이하, 저장 범위 이내
/// Validate a monetary amount; returns the amount normalized to scale 2
pub fn validate_amount(amount: Decimal) -> Result<Decimal, String> {
    if amount <= Decimal::ZERO {
        return Err(format!("amount must be greater than zero, got {}", amount));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(format!("amount must have at most {} decimal places, got {}", AMOUNT_SCALE, amount));
    }
    if amount > max_amount() {
        return Err(format!("amount exceeds the maximum of {}", max_amount()));
    }

    let mut normalized = amount;
    normalized.rescale(AMOUNT_SCALE);
    Ok(normalized)
}

/// 최소 단위 변환 (예: NGN -> kobo)
/// Convert to the gateway's minor unit (amount * 100)
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    let minor = (amount * Decimal::ONE_HUNDRED).trunc();
    i64::try_from(minor).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_positive_amounts() {
        assert!(validate_amount(Decimal::ZERO).is_err());
        assert!(validate_amount(Decimal::new(-5, 0)).is_err());
    }

    #[test]
    fn test_rejects_sub_cent_precision() {
        assert!(validate_amount(Decimal::new(1001, 3)).is_err());
        // 1.500 은 1.50 과 같으므로 허용
        assert_eq!(validate_amount(Decimal::new(1500, 3)).unwrap(), Decimal::new(150, 2));
    }

    #[test]
    fn test_rejects_amounts_beyond_storage() {
        assert!(validate_amount(Decimal::new(10_000_000_000, 0)).is_err());
        assert!(validate_amount(max_amount()).is_ok());
    }

    #[test]
    fn test_minor_units() {
        assert_eq!(to_minor_units(Decimal::new(5000, 0)), Some(500_000));
        assert_eq!(to_minor_units(Decimal::new(10050, 2)), Some(10_050));
    }
}
