use bytemuck::{Pod, Zeroable};
use bytes::{BufMut, Bytes, BytesMut};
use log::debug;
use memsim_error::Error;
use serde::{Deserialize, Serialize};
use std::mem;

use crate::Result;

/// A named logical region of memory and its size in pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub name: String,
    pub size_in_pages: usize,
}

impl SegmentDescriptor {
    pub fn new(name: impl Into<String>, size_in_pages: usize) -> Self {
        Self {
            name: name.into(),
            size_in_pages,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryMapEntry {
    pub segment: String,
    /// Page index within the segment.
    pub page: usize,
    pub address: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTableEntry {
    pub segment: String,
    pub page: usize,
    pub logical: usize,
    pub physical: usize,
}

/// Page table produced by [`build_segments`], in layout order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageTable {
    entries: Vec<PageTableEntry>,
}

/// Memory map and page table of one segment layout.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentLayout {
    #[serde(rename = "segments")]
    pub memory_map: Vec<MemoryMapEntry>,
    pub page_table: PageTable,
}

/// Lays segments out back to back, in the given order, starting at address 0.
pub fn build_segments(segments: &[SegmentDescriptor]) -> SegmentLayout {
    let mut layout = SegmentLayout::default();
    let mut address = 0;

    for segment in segments {
        debug!(
            "segment {} occupies {} pages from address {}",
            segment.name, segment.size_in_pages, address
        );
        for page in 0..segment.size_in_pages {
            layout.memory_map.push(MemoryMapEntry {
                segment: segment.name.clone(),
                page,
                address,
            });
            layout.page_table.entries.push(PageTableEntry {
                segment: segment.name.clone(),
                page,
                logical: page,
                physical: address,
            });
            address += 1;
        }
    }

    layout
}

impl SegmentLayout {
    pub fn total_pages(&self) -> usize {
        self.memory_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memory_map.is_empty()
    }
}

impl PageTable {
    pub fn entries(&self) -> &[PageTableEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Physical frame holding logical page `logical` of `segment`.
    /// With duplicate segment names the first one laid out wins.
    pub fn translate(&self, segment: &str, logical: usize) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.segment == segment && entry.logical == logical)
            .map(|entry| entry.physical)
    }

    /// Number of segments that own at least one page.
    fn segment_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.page == 0).count()
    }

    /// Encodes the table as the packed little-endian image a kernel would keep
    /// in a frame: a header followed by one record per entry.
    pub fn to_image(&self) -> Result<Bytes> {
        let mut buf =
            BytesMut::with_capacity(PAGE_TABLE_HEADER_SIZE + self.entries.len() * RAW_ENTRY_SIZE);

        let header = PageTableHeader {
            entry_count: to_u32(self.entries.len())?,
            segment_count: to_u32(self.segment_count())?,
        };
        buf.put_slice(bytemuck::bytes_of(&header.to_le()));

        let mut segment_index = 0u32;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 && entry.page == 0 {
                segment_index += 1;
            }
            let raw = RawPageTableEntry {
                segment_index,
                logical: to_u32(entry.logical)?,
                physical: to_u32(entry.physical)?,
            };
            buf.put_slice(bytemuck::bytes_of(&raw.to_le()));
        }

        Ok(buf.freeze())
    }
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| Error::Encoding(format!("page table value {} exceeds 32 bits", value)))
}

#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct PageTableHeader {
    entry_count: u32,
    segment_count: u32,
}

#[repr(C)]
#[derive(Pod, Zeroable, Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct RawPageTableEntry {
    segment_index: u32,
    logical: u32,
    physical: u32,
}

pub(crate) const PAGE_TABLE_HEADER_SIZE: usize = mem::size_of::<PageTableHeader>();
pub(crate) const RAW_ENTRY_SIZE: usize = mem::size_of::<RawPageTableEntry>();

impl PageTableHeader {
    fn to_le(self) -> Self {
        Self {
            entry_count: self.entry_count.to_le(),
            segment_count: self.segment_count.to_le(),
        }
    }
}

impl RawPageTableEntry {
    fn to_le(self) -> Self {
        Self {
            segment_index: self.segment_index.to_le(),
            logical: self.logical.to_le(),
            physical: self.physical.to_le(),
        }
    }
}

/// Read-only view over an encoded page-table image.
pub struct PageTableImage {
    data: Bytes,
}

impl PageTableImage {
    pub fn new(data: Bytes) -> Result<Self> {
        if data.len() < PAGE_TABLE_HEADER_SIZE {
            return Err(Error::Encoding(format!(
                "page table image is {} bytes, shorter than its header",
                data.len()
            )));
        }
        let image = Self { data };
        let expected = PAGE_TABLE_HEADER_SIZE + image.entry_count() as usize * RAW_ENTRY_SIZE;
        if image.data.len() != expected {
            return Err(Error::Encoding(format!(
                "page table image is {} bytes, expected {}",
                image.data.len(),
                expected
            )));
        }
        Ok(image)
    }

    fn header(&self) -> PageTableHeader {
        let header: PageTableHeader =
            bytemuck::pod_read_unaligned(&self.data[..PAGE_TABLE_HEADER_SIZE]);
        PageTableHeader {
            entry_count: u32::from_le(header.entry_count),
            segment_count: u32::from_le(header.segment_count),
        }
    }

    pub fn entry_count(&self) -> u32 {
        self.header().entry_count
    }

    pub fn segment_count(&self) -> u32 {
        self.header().segment_count
    }

    /// Decoded `(segment_index, logical, physical)` records, in table order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, u32, u32)> + '_ {
        self.data[PAGE_TABLE_HEADER_SIZE..]
            .chunks_exact(RAW_ENTRY_SIZE)
            .map(|chunk| {
                let raw: RawPageTableEntry = bytemuck::pod_read_unaligned(chunk);
                (
                    u32::from_le(raw.segment_index),
                    u32::from_le(raw.logical),
                    u32::from_le(raw.physical),
                )
            })
    }
}
