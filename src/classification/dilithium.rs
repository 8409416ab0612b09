//! Built-in classification of the Dilithium benchmark functions.

use super::table::{Classification, GroupSpec};
use crate::utils::error::GroupingError;
use std::collections::BTreeMap;

const POLYNOMIAL_ARITHMETIC: &[&str] = &[
    "intt_base_dilithium",
    "ntt_base_dilithium",
    "poly_pointwise_acc_base_dilithium",
    "poly_pointwise_base_dilithium",
    "poly_sub_base_dilithium",
    "poly_add_base_dilithium",
    "poly_add_pseudovec_base_dilithium",
    "poly_pointwise_acc_dilithium",
    "intt_dilithium",
    "ntt_dilithium",
    "poly_pointwise_dilithium",
    "poly_add_dilithium",
    "poly_sub_dilithium",
];

const REDUCTION: &[&str] = &[
    "poly_reduce32_pos_dilithium",
    "poly_reduce32_dilithium",
    "poly_reduce32_short_dilithium",
    "poly_caddq_base_dilithium",
    "poly_caddq_dilithium",
];

const SAMPLING: &[&str] = &[
    "poly_uniform_base_dilithium",
    "poly_uniform_gamma1_base_dilithium",
    "poly_challenge",
    "poly_chknorm_base_dilithium",
    "poly_uniform_eta_base_dilithium",
    "poly_uniform",
    "poly_uniform_eta",
    "poly_chknorm_dilithium",
    "poly_uniform_gamma1_dilithium",
];

const ROUNDING: &[&str] = &[
    "decompose_base_dilithium",
    "poly_make_hint_dilithium",
    "poly_decompose_dilithium",
    "poly_use_hint_dilithium",
    "poly_power2round_base_dilithium",
    "poly_power2round_dilithium",
    "decompose_dilithium",
];

const PACKING: &[&str] = &[
    "polyw1_pack_dilithium",
    "polyeta_unpack_base_dilithium",
    "polyvec_encode_h_dilithium",
    "polyz_pack_base_dilithium",
    "polyt0_unpack_base_dilithium",
    "polyz_unpack_base_dilithium",
    "polyt1_unpack_dilithium",
    "polyvec_decode_h_dilithium",
    "polyeta_pack_dilithium",
    "polyt0_pack_base_dilithium",
    "polyt1_pack_dilithium",
    "polyt0_pack_dilithium",
    "polyz_unpack_dilithium",
    "polyeta_unpack_dilithium",
    "polyz_pack_dilithium",
    "polyt0_unpack_dilithium",
];

const SHAKE: &[&str] = &["SHAKE", "keccak_send_message"];

const OTHER: &[&str] = &[
    "main",
    "sign_base_dilithium",
    "verify_base_dilithium",
    "key_pair_base_dilithium",
    "key_pair_dilithium",
    "verify_dilithium",
    "sign_dilithium",
];

/// (group, color, functions)
const DILITHIUM_GROUPS: &[(&str, &str, &[&str])] = &[
    ("Polynomial Arithmetic", "set37c1", POLYNOMIAL_ARITHMETIC),
    ("Sampling", "set37c2", SAMPLING),
    ("Rounding", "set37c3", ROUNDING),
    ("Packing", "set37c4", PACKING),
    ("Reduction", "set37c5", REDUCTION),
    ("SHAKE", "set37c6", SHAKE),
    ("Other", "set37c7", OTHER),
];

impl Classification {
    /// Classification used for the Dilithium sign/verify/keypair benchmarks
    pub fn dilithium() -> Result<Self, GroupingError> {
        let groups: BTreeMap<String, GroupSpec> = DILITHIUM_GROUPS
            .iter()
            .map(|(group, color, functions)| {
                (
                    group.to_string(),
                    GroupSpec {
                        color: Some(color.to_string()),
                        functions: functions.iter().map(|f| f.to_string()).collect(),
                    },
                )
            })
            .collect();

        Classification::from_groups(groups)
    }
}
