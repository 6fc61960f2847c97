//! ### English
//! Persistent client-memory backing for unbuffered vertex attributes.
//!
//! GL reads client-side vertex arrays at draw time, long after the producer's buffer is gone.
//! Each attribute index owns one byte buffer on the GPU thread; pointer commands copy their
//! vertex data into it and point GL at the copy.
//!
//! ### 中文
//! 无缓冲顶点属性的持久客户端内存。
//!
//! GL 在 draw 时才读取客户端顶点数组，此时生产者的缓冲区早已失效。
//! 每个属性索引在 GPU 线程上拥有一个字节缓冲区；指针命令会把顶点数据复制进去，并让 GL 指向该副本。

/// ### English
/// Number of attribute slots.
///
/// ### 中文
/// 属性槽位数量。
pub const MAX_ATTRIB_INDEX: usize = 8;

#[derive(Debug, Default)]
pub(crate) struct UnbufferedAttribs {
    slots: [Option<Vec<u8>>; MAX_ATTRIB_INDEX],
}

impl UnbufferedAttribs {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// ### English
    /// Copies `data` to the start of slot `index` and returns the whole slot.
    ///
    /// The slot grows to fit `data` and never shrinks; bytes past `data.len()` keep older content.
    /// Returns `None` when `index` is out of range.
    ///
    /// ### 中文
    /// 将 `data` 复制到槽位 `index` 的起始处并返回整个槽位。
    ///
    /// 槽位会扩容以容纳 `data` 且从不收缩；`data.len()` 之后的字节保留旧内容。
    /// `index` 越界时返回 `None`。
    pub(crate) fn update(&mut self, index: usize, data: &[u8]) -> Option<&[u8]> {
        let slot = self.slots.get_mut(index)?;
        match slot {
            None => *slot = Some(data.to_vec()),
            Some(buffer) => {
                if buffer.len() < data.len() {
                    buffer.resize(data.len(), 0);
                }
                buffer[..data.len()].copy_from_slice(data);
            }
        }
        slot.as_deref()
    }

    pub(crate) fn slot(&self, index: usize) -> Option<&[u8]> {
        self.slots.get(index)?.as_deref()
    }
}
