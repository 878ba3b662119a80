//! Check digit validation for CPF and CNPJ numbers.
//!
//! Both validators expect an already normalized digit string; anything that
//! is not exactly the right number of ASCII digits is rejected.

pub const CPF_LENGTH: usize = 11;
pub const CNPJ_LENGTH: usize = 14;

pub(crate) const CNPJ_FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
pub(crate) const CNPJ_SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

/// A document number whose last two digits are check digits.
pub trait DocumentChecksum {
    fn is_valid(&self, digits: &str) -> bool;
}

pub struct CpfChecksum;

pub struct CnpjChecksum;

impl DocumentChecksum for CpfChecksum {
    fn is_valid(&self, digits: &str) -> bool {
        let Some(d) = parse_digits::<CPF_LENGTH>(digits) else {
            return false;
        };

        if is_uniform(&d) {
            return false;
        }

        cpf_check_digit(&d[..9]) == d[9] && cpf_check_digit(&d[..10]) == d[10]
    }
}

impl DocumentChecksum for CnpjChecksum {
    fn is_valid(&self, digits: &str) -> bool {
        let Some(d) = parse_digits::<CNPJ_LENGTH>(digits) else {
            return false;
        };

        if is_uniform(&d) {
            return false;
        }

        cnpj_check_digit(&d[..12], &CNPJ_FIRST_WEIGHTS) == d[12]
            && cnpj_check_digit(&d[..13], &CNPJ_SECOND_WEIGHTS) == d[13]
    }
}

/// Validate an 11 digit CPF.
pub fn is_valid_cpf(digits: &str) -> bool {
    CpfChecksum.is_valid(digits)
}

/// Validate a 14 digit CNPJ.
pub fn is_valid_cnpj(digits: &str) -> bool {
    CnpjChecksum.is_valid(digits)
}

/// CPF check digit over `digits`: weights run down from `len + 1` to 2,
/// and a remainder of 10 (or 11) maps to 0.
pub(crate) fn cpf_check_digit(digits: &[u32]) -> u32 {
    let first_weight = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (first_weight - i as u32))
        .sum();

    let remainder = (sum * 10) % 11;
    if remainder >= 10 { 0 } else { remainder }
}

/// CNPJ check digit over `digits` using the index aligned `weights`.
pub(crate) fn cnpj_check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();

    let remainder = sum % 11;
    if remainder < 2 { 0 } else { 11 - remainder }
}

fn parse_digits<const N: usize>(digits: &str) -> Option<[u32; N]> {
    if digits.len() != N || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut parsed = [0; N];
    for (slot, byte) in parsed.iter_mut().zip(digits.bytes()) {
        *slot = u32::from(byte - b'0');
    }
    Some(parsed)
}

fn is_uniform(digits: &[u32]) -> bool {
    digits.windows(2).all(|pair| pair[0] == pair[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_valid_cpfs() {
        assert!(is_valid_cpf("11144477735"));
        assert!(is_valid_cpf("52998224725"));
    }

    #[test]
    fn test_cpf_wrong_check_digits() {
        assert!(!is_valid_cpf("11144477736"));
        assert!(!is_valid_cpf("11144477725"));
        assert!(!is_valid_cpf("52998224700"));
    }

    #[test]
    fn test_cpf_uniform_digits_rejected() {
        // "11111111111" satisfies both check digits, it must still be rejected
        for digit in 0..=9 {
            let cpf = digit.to_string().repeat(CPF_LENGTH);
            assert!(!is_valid_cpf(&cpf), "{cpf} should be rejected");
        }
    }

    #[test]
    fn test_cpf_wrong_length() {
        assert!(!is_valid_cpf(""));
        assert!(!is_valid_cpf("1114447773"));
        assert!(!is_valid_cpf("111444777350"));
    }

    #[test]
    fn test_cpf_non_digit_characters() {
        assert!(!is_valid_cpf("111.444.777"));
        assert!(!is_valid_cpf("abcdefghijk"));
    }

    #[test]
    fn test_known_valid_cnpjs() {
        assert!(is_valid_cnpj("11222333000181"));
        assert!(is_valid_cnpj("00623904000173"));
    }

    #[test]
    fn test_cnpj_wrong_check_digits() {
        assert!(!is_valid_cnpj("11222333000182"));
        assert!(!is_valid_cnpj("00623904000171"));
        assert!(!is_valid_cnpj("00623904000153"));
    }

    #[test]
    fn test_cnpj_uniform_digits_rejected() {
        for digit in 0..=9 {
            let cnpj = digit.to_string().repeat(CNPJ_LENGTH);
            assert!(!is_valid_cnpj(&cnpj), "{cnpj} should be rejected");
        }
    }

    #[test]
    fn test_cnpj_wrong_length() {
        assert!(!is_valid_cnpj("11144477735"));
        assert!(!is_valid_cnpj("112223330001810"));
    }

    #[test]
    fn test_cpf_is_not_a_cnpj() {
        assert!(!is_valid_cnpj("11144477735"));
        assert!(!is_valid_cpf("11222333000181"));
    }

    #[test]
    fn test_cpf_check_digit_remainder_ten_maps_to_zero() {
        // 100000000: sum 10, (10 * 10) % 11 = 1; 100000001: sum 12 -> 120 % 11 = 10 -> 0
        assert_eq!(cpf_check_digit(&[1, 0, 0, 0, 0, 0, 0, 0, 0]), 1);
        assert_eq!(cpf_check_digit(&[1, 0, 0, 0, 0, 0, 0, 0, 1]), 0);
    }

    #[test]
    fn test_cnpj_check_digit_small_remainder_maps_to_zero() {
        // sum 11 -> remainder 0; sum 12 -> remainder 1
        let digits = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 4];
        assert_eq!(cnpj_check_digit(&digits, &CNPJ_FIRST_WEIGHTS), 0);
        let digits = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 3];
        assert_eq!(cnpj_check_digit(&digits, &CNPJ_FIRST_WEIGHTS), 0);
    }
}
