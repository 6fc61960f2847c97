//! Recording `HostVideo` fake for unit tests.
use std::ffi::{CStr, c_void};
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use super::HostVideo;

#[derive(Default)]
pub(crate) struct RecordingHost {
    calls: Mutex<Vec<String>>,
    threads: Mutex<Vec<Option<String>>>,
    set_video_mode_status: AtomicI32,
}

impl RecordingHost {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Names of the threads each call ran on.
    pub(crate) fn threads(&self) -> Vec<Option<String>> {
        self.threads.lock().unwrap().clone()
    }

    pub(crate) fn fail_set_video_mode(&self, status: i32) {
        self.set_video_mode_status.store(status, Ordering::Relaxed);
    }

    fn log(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        self.threads
            .lock()
            .unwrap()
            .push(thread::current().name().map(str::to_string));
    }
}

impl HostVideo for RecordingHost {
    fn init(&self) -> i32 {
        self.log("init".to_string());
        0
    }

    fn quit(&self) -> i32 {
        self.log("quit".to_string());
        0
    }

    fn set_video_mode(&self, width: i32, height: i32, bits_per_pixel: i32, mode: i32, flags: i32) -> i32 {
        self.log(format!(
            "set_video_mode({width}, {height}, {bits_per_pixel}, {mode}, {flags})"
        ));
        self.set_video_mode_status.load(Ordering::Relaxed)
    }

    fn gl_set_attribute(&self, attribute: i32, value: i32) -> i32 {
        self.log(format!("gl_set_attribute({attribute}, {value})"));
        0
    }

    fn gl_get_attribute(&self, attribute: i32) -> (i32, i32) {
        self.log(format!("gl_get_attribute({attribute})"));
        (0, attribute + 100)
    }

    fn swap_buffers(&self) -> i32 {
        self.log("swap_buffers".to_string());
        0
    }

    fn get_proc_address(&self, name: &CStr) -> *const c_void {
        self.log(format!("get_proc_address({})", name.to_string_lossy()));
        std::ptr::null()
    }
}
