pub const DEFAULT_CONFIG_PATH: &str = "reaper.toml";

pub const COMPUTE_API_VERSION: &str = "2019-07-01";
pub const RESOURCE_API_VERSION: &str = "2019-07-01";
pub const DELETE_API_VERSION: &str = "2019-07-01";

pub const DEFAULT_ACTIVE_DIRECTORY_ENDPOINT: &str = "https://login.microsoftonline.com";
pub const DEFAULT_RESOURCE_MANAGER_ENDPOINT: &str = "https://management.azure.com/";

pub const PROTECTION_MARKER: &str = "DO_NOT_CLEANUP";
pub const EXPIRE_TAG_FRAGMENT: &str = "expire";
pub const CREATED_TAG: &str = "created";
pub const DISK_REQUIRED_TAG: &str = "product";
pub const VIRTUAL_MACHINE_TYPE_FRAGMENT: &str = "virtualMachines";

pub const RETENTION_DAYS: i64 = 5;
pub const DISK_CLOCK_SKEW_HOURS: i64 = 24;
pub const EXPIRE_GRACE_DAYS: i64 = 1;

pub const REPORT_NIL: &str = "Nil";
pub const REPORT_HEADER: [&str; 3] = ["Name", "Tags", "Expire"];
pub const WITH_EXPIRE_REPORT: &str = "with_tags.csv";
pub const WITHOUT_EXPIRE_REPORT: &str = "without_tags.csv";
