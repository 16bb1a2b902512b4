pub fn resolver_version() -> &'static str {
    // See build.rs
    env!("RESOLVERD_CI_TAG")
}

pub fn resolver_target_triple() -> &'static str {
    // See build.rs
    env!("RESOLVERD_TARGET_TRIPLE")
}
