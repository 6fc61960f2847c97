#[unsafe(no_mangle)]
/// ### English
/// Returns the C ABI version.
///
/// ### 中文
/// 返回 C ABI 版本号。
pub extern "C" fn n64gl_abi_version() -> u32 {
    super::N64GL_ABI_VERSION
}
