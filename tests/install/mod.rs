mod backup_before_overwrite;
mod open_failure;
mod stat_failure;
