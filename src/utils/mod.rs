pub mod flake_root;
pub mod package_filter;
