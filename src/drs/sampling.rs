//! Instantaneous versus time-averaged sampling.
//!
//! CMOR tables declare a handful of (variable, table, realm) combinations as
//! point-in-time samples. Their time value sits on the upper bound of the cell;
//! everything else is averaged over the cell and sits on its midpoint.
//!
//! The list below is reference data from the CMIP5 tables. It is not derivable
//! and must be edited as data, never replaced by pattern matching.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::drs::DrsName;

/// (variable, table, realm) triples that require an instantaneous time axis.
pub const INSTANT_TRIPLES: &[(&str, &str, &str)] = &[
    ("tas", "3hr", "atmos"),
    ("uas", "3hr", "atmos"),
    ("vas", "3hr", "atmos"),
    ("huss", "3hr", "atmos"),
    ("mrsos", "3hr", "land"),
    ("tslsi", "3hr", "land"),
    ("tso", "3hr", "ocean"),
    ("ps", "3hr", "atmos"),
    ("ua", "6hrPlev", "atmos"),
    ("va", "6hrPlev", "atmos"),
    ("ta", "6hrPlev", "atmos"),
    ("psl", "6hrPlev", "atmos"),
    ("clcalipso", "cf3hr", "atmos"),
    ("clcalipso2", "cf3hr", "atmos"),
    ("cfadDbze94", "cf3hr", "atmos"),
    ("cfadLidarsr532", "cf3hr", "atmos"),
    ("parasolRefl", "cf3hr", "atmos"),
    ("cltcalipso", "cf3hr", "atmos"),
    ("cllcalipso", "cf3hr", "atmos"),
    ("clmcalipso", "cf3hr", "atmos"),
    ("clhcalipso", "cf3hr", "atmos"),
    ("lon", "cf3hr", "atmos"),
    ("lat", "cf3hr", "atmos"),
    ("tas", "cf3hr", "atmos"),
    ("ts", "cf3hr", "atmos"),
    ("tasmin", "cf3hr", "atmos"),
    ("tasmax", "cf3hr", "atmos"),
    ("psl", "cf3hr", "atmos"),
    ("ps", "cf3hr", "atmos"),
    ("uas", "cf3hr", "atmos"),
    ("vas", "cf3hr", "atmos"),
    ("sfcWind", "cf3hr", "atmos"),
    ("hurs", "cf3hr", "atmos"),
    ("huss", "cf3hr", "atmos"),
    ("pr", "cf3hr", "atmos"),
    ("prsn", "cf3hr", "atmos"),
    ("prc", "cf3hr", "atmos"),
    ("evspsbl", "cf3hr", "atmos"),
    ("sbl", "cf3hr", "atmos"),
    ("tauu", "cf3hr", "atmos"),
    ("tauv", "cf3hr", "atmos"),
    ("hfls", "cf3hr", "atmos"),
    ("hfss", "cf3hr", "atmos"),
    ("rlds", "cf3hr", "atmos"),
    ("rlus", "cf3hr", "atmos"),
    ("rsds", "cf3hr", "atmos"),
    ("rsus", "cf3hr", "atmos"),
    ("rsdscs", "cf3hr", "atmos"),
    ("rsuscs", "cf3hr", "atmos"),
    ("rldscs", "cf3hr", "atmos"),
    ("rsdt", "cf3hr", "atmos"),
    ("rsut", "cf3hr", "atmos"),
    ("rlut", "cf3hr", "atmos"),
    ("rlutcs", "cf3hr", "atmos"),
    ("rsutcs", "cf3hr", "atmos"),
    ("prw", "cf3hr", "atmos"),
    ("clt", "cf3hr", "atmos"),
    ("clwvi", "cf3hr", "atmos"),
    ("clivi", "cf3hr", "atmos"),
    ("rtmt", "cf3hr", "atmos"),
    ("ccb", "cf3hr", "atmos"),
    ("cct", "cf3hr", "atmos"),
    ("ci", "cf3hr", "atmos"),
    ("sci", "cf3hr", "atmos"),
    ("fco2antt", "cf3hr", "atmos"),
    ("fco2fos", "cf3hr", "atmos"),
    ("fco2nat", "cf3hr", "atmos"),
    ("cltc", "cf3hr", "atmos"),
    ("zfull", "cf3hr", "atmos"),
    ("zhalf", "cf3hr", "atmos"),
    ("pfull", "cf3hr", "atmos"),
    ("phalf", "cf3hr", "atmos"),
    ("ta", "cf3hr", "atmos"),
    ("h2o", "cf3hr", "atmos"),
    ("clws", "cf3hr", "atmos"),
    ("clis", "cf3hr", "atmos"),
    ("clwc", "cf3hr", "atmos"),
    ("clic", "cf3hr", "atmos"),
    ("reffclws", "cf3hr", "atmos"),
    ("reffclis", "cf3hr", "atmos"),
    ("reffclwc", "cf3hr", "atmos"),
    ("reffclic", "cf3hr", "atmos"),
    ("grpllsprof", "cf3hr", "atmos"),
    ("prcprof", "cf3hr", "atmos"),
    ("prlsprof", "cf3hr", "atmos"),
    ("prsnc", "cf3hr", "atmos"),
    ("prlsns", "cf3hr", "atmos"),
    ("reffgrpls", "cf3hr", "atmos"),
    ("reffrainc", "cf3hr", "atmos"),
    ("reffrains", "cf3hr", "atmos"),
    ("reffsnowc", "cf3hr", "atmos"),
    ("reffsnows", "cf3hr", "atmos"),
    ("dtaus", "cf3hr", "atmos"),
    ("dtauc", "cf3hr", "atmos"),
    ("dems", "cf3hr", "atmos"),
    ("demc", "cf3hr", "atmos"),
    ("clc", "cf3hr", "atmos"),
    ("cls", "cf3hr", "atmos"),
    ("tas", "cfSites", "atmos"),
    ("ts", "cfSites", "atmos"),
    ("psl", "cfSites", "atmos"),
    ("ps", "cfSites", "atmos"),
    ("uas", "cfSites", "atmos"),
    ("vas", "cfSites", "atmos"),
    ("sfcWind", "cfSites", "atmos"),
    ("hurs", "cfSites", "atmos"),
    ("huss", "cfSites", "atmos"),
    ("pr", "cfSites", "atmos"),
    ("prsn", "cfSites", "atmos"),
    ("prc", "cfSites", "atmos"),
    ("evspsbl", "cfSites", "atmos"),
    ("sbl", "cfSites", "atmos"),
    ("tauu", "cfSites", "atmos"),
    ("tauv", "cfSites", "atmos"),
    ("hfls", "cfSites", "atmos"),
    ("hfss", "cfSites", "atmos"),
    ("rlds", "cfSites", "atmos"),
    ("rlus", "cfSites", "atmos"),
    ("rsds", "cfSites", "atmos"),
    ("rsus", "cfSites", "atmos"),
    ("rsdscs", "cfSites", "atmos"),
    ("rsuscs", "cfSites", "atmos"),
    ("rldscs", "cfSites", "atmos"),
    ("rsdt", "cfSites", "atmos"),
    ("rsut", "cfSites", "atmos"),
    ("rlut", "cfSites", "atmos"),
    ("rlutcs", "cfSites", "atmos"),
    ("rsutcs", "cfSites", "atmos"),
    ("prw", "cfSites", "atmos"),
    ("clt", "cfSites", "atmos"),
    ("clwvi", "cfSites", "atmos"),
    ("clivi", "cfSites", "atmos"),
    ("rtmt", "cfSites", "atmos"),
    ("ccb", "cfSites", "atmos"),
    ("cct", "cfSites", "atmos"),
    ("ci", "cfSites", "atmos"),
    ("sci", "cfSites", "atmos"),
    ("fco2antt", "cfSites", "atmos"),
    ("fco2fos", "cfSites", "atmos"),
    ("fco2nat", "cfSites", "atmos"),
    ("cl", "cfSites", "atmos"),
    ("clw", "cfSites", "atmos"),
    ("cli", "cfSites", "atmos"),
    ("mc", "cfSites", "atmos"),
    ("ta", "cfSites", "atmos"),
    ("ua", "cfSites", "atmos"),
    ("va", "cfSites", "atmos"),
    ("hus", "cfSites", "atmos"),
    ("hur", "cfSites", "atmos"),
    ("wap", "cfSites", "atmos"),
    ("zg", "cfSites", "atmos"),
    ("rlu", "cfSites", "atmos"),
    ("rsu", "cfSites", "atmos"),
    ("rld", "cfSites", "atmos"),
    ("rsd", "cfSites", "atmos"),
    ("rlucs", "cfSites", "atmos"),
    ("rsucs", "cfSites", "atmos"),
    ("rldcs", "cfSites", "atmos"),
    ("rsdcs", "cfSites", "atmos"),
    ("tnt", "cfSites", "atmos"),
    ("tnta", "cfSites", "atmos"),
    ("tntmp", "cfSites", "atmos"),
    ("tntscpbl", "cfSites", "atmos"),
    ("tntr", "cfSites", "atmos"),
    ("tntc", "cfSites", "atmos"),
    ("tnhus", "cfSites", "atmos"),
    ("tnhusa", "cfSites", "atmos"),
    ("tnhusc", "cfSites", "atmos"),
    ("tnhusd", "cfSites", "atmos"),
    ("tnhusscpbl", "cfSites", "atmos"),
    ("tnhusmp", "cfSites", "atmos"),
    ("evu", "cfSites", "atmos"),
    ("edt", "cfSites", "atmos"),
    ("pfull", "cfSites", "atmos"),
    ("phalf", "cfSites", "atmos"),
];

static INSTANT_SET: LazyLock<HashSet<(&'static str, &'static str, &'static str)>> =
    LazyLock::new(|| INSTANT_TRIPLES.iter().copied().collect());

/// True when the triple is sampled at points in time.
pub fn is_instant(variable: &str, table: &str, realm: &str) -> bool {
    INSTANT_SET.contains(&(variable, table, realm))
}

/// Classify a decoded file name under the batch realm.
pub fn is_instant_file(name: &DrsName, realm: &str) -> bool {
    is_instant(&name.variable, &name.table, realm)
}
