//! Directory convention of a XAMPP MySQL installation
//!
//! ```text
//! <root>/
//!   backup/      clean baseline shipped with XAMPP (never mutated)
//!   data/        live schema directories + ibdata1
//!   data_old/    previous `data`, or data_old_<YYYYMMDD_HHMMSS>
//! ```

pub const DATA_DIR: &str = "data";
pub const BACKUP_DIR: &str = "backup";
pub const ARCHIVE_BASE: &str = "data_old";

/// InnoDB shared tablespace. Always taken from the archive when present.
pub const SHARED_TABLESPACE: &str = "ibdata1";

/// System schemas supplied by `backup`; never copied back from the archive.
pub const EXCLUDED_SCHEMAS: [&str; 3] = ["mysql", "performance_schema", "phpmyadmin"];

pub const DEFAULT_ROOT: &str = "C:/xampp/mysql";
pub const DEFAULT_INSPECT_PORT: u16 = 3306;
pub const SERVER_PROCESS: &str = "mysqld";

pub fn is_excluded(name: &str) -> bool {
    EXCLUDED_SCHEMAS.contains(&name)
}
