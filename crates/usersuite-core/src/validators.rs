//! Input validators shared across the workspace

use crate::error::AppError;

/// Validate a database access mask of four dot-separated octets
///
/// Each octet must be either a 1-3 digit group with a value of 1-255 or the
/// `%` wildcard alone; mixing digits and wildcards, or repeating the
/// wildcard within an octet, is rejected. Masks of this shape are used when
/// granting hosting-database access from a resident's subnet (e.g.
/// `141.30.224.%`).
pub fn validate_ip_mask(mask: &str) -> Result<(), AppError> {
    let octets: Vec<&str> = mask.split('.').collect();
    if octets.len() != 4 {
        return Err(AppError::Validation(format!(
            "invalid ip mask '{}': expected 4 octets",
            mask
        )));
    }

    for octet in octets {
        if octet == "%" {
            continue;
        }
        let numeric = octet.len() <= 3
            && !octet.is_empty()
            && octet.bytes().all(|b| b.is_ascii_digit())
            && matches!(octet.parse::<u16>(), Ok(1..=255));
        if !numeric {
            return Err(AppError::Validation(format!(
                "invalid ip mask '{}': bad octet '{}'",
                mask, octet
            )));
        }
    }

    Ok(())
}

/// Validate a colon-separated MAC address (six hex octets)
pub fn validate_mac(mac: &str) -> Result<(), AppError> {
    let groups: Vec<&str> = mac.split(':').collect();
    let well_formed = groups.len() == 6
        && groups
            .iter()
            .all(|g| g.len() == 2 && g.bytes().all(|b| b.is_ascii_hexdigit()));

    if well_formed {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "invalid mac address '{}'",
            mac
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_mask_accepts_valid_octet_permutations() {
        let elements = ["1", "125", "255", "%"];
        for a in elements {
            for b in elements {
                for c in elements {
                    for d in elements {
                        let mask = format!("{}.{}.{}.{}", a, b, c, d);
                        assert!(validate_ip_mask(&mask).is_ok(), "rejected {}", mask);
                    }
                }
            }
        }
    }

    #[test]
    fn test_ip_mask_rejects_wildcard_digit_mixtures() {
        // Any position holding a mixed or repeated wildcard invalidates the
        // whole mask.
        for bad in ["%%", "%%%", "1%1", "1%%1"] {
            for position in 0..4 {
                let mut octets = ["1", "125", "255", "%"];
                octets[position] = bad;
                let mask = octets.join(".");
                assert!(validate_ip_mask(&mask).is_err(), "accepted {}", mask);
            }
        }
    }

    #[test]
    fn test_ip_mask_rejects_out_of_range_and_malformed() {
        for bad in [
            "256.1.1.1",
            "0.1.1.1",
            "1.1.1",
            "1.1.1.1.1",
            "a.b.c.d",
            "1..1.1",
            "",
        ] {
            assert!(validate_ip_mask(bad).is_err(), "accepted {}", bad);
        }
    }

    #[test]
    fn test_mac_validation() {
        assert!(validate_mac("aa:bb:cc:dd:ee:ff").is_ok());
        assert!(validate_mac("00:1A:2B:3C:4D:5E").is_ok());

        assert!(validate_mac("aa:bb:cc:dd:ee").is_err());
        assert!(validate_mac("aa:bb:cc:dd:ee:gg").is_err());
        assert!(validate_mac("aabb.ccdd.eeff").is_err());
        assert!(validate_mac("aa:bb:cc:dd:ee:ff:00").is_err());
    }
}
