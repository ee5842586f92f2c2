//! # Algorithms Module
//!
//! Pure functions over connection table snapshots: classification,
//! admission rules and preferred channel lists.

pub mod admission;
pub mod classifier;
pub mod pcl;

pub use admission::{
    allow_sap_go_concurrency, check_allow_concurrency, check_concurrency, check_fourth_connection,
    AdmissionContext, RejectReason, Verdict,
};
pub use classifier::{
    freqs_on_same_mac, is_any_dfs_beaconing_session_present, is_current_hwmode_dbs, is_mcc,
    is_mcc_in_24ghz, is_scc, is_sta_present_on_dfs_channel,
};
pub use pcl::{
    build_pcl, channel_weight, WEIGHT_GROUP1, WEIGHT_GROUP2, WEIGHT_GROUP3, WEIGHT_NON_PCL,
};
