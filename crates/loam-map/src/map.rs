//! The map container: owning header, grids, and element stores.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::debug;

use loam_schema::{ByteReader, ByteWriter, FixedBytes, Record};

use crate::error::FormatError;
use crate::grid::Grid;
use crate::records::{
    ElementKind, FuzzRecord, LightRecord, MapHeader, MeshRecord, Positioned, QuadRecord,
    Section, MAP_SIGNATURE,
};
use crate::rect::Rect;
use crate::store::ElementStore;
use crate::{NO_GROUND, NO_SEGMENT, NO_TILE, TILES_PER_GROUND};

/// Borrowed reference to an element of any kind.
#[derive(Clone, Copy, Debug)]
pub enum ElementRef<'a> {
    /// A mesh element.
    Mesh(&'a MeshRecord),
    /// A quad element.
    Quad(&'a QuadRecord),
    /// A light element.
    Light(&'a LightRecord),
    /// A fuzz element.
    Fuzz(&'a FuzzRecord),
}

impl ElementRef<'_> {
    /// The element's kind.
    pub fn kind(&self) -> ElementKind {
        match self {
            Self::Mesh(_) => ElementKind::Mesh,
            Self::Quad(_) => ElementKind::Quad,
            Self::Light(_) => ElementKind::Light,
            Self::Fuzz(_) => ElementKind::Fuzz,
        }
    }

    /// The element's world position.
    pub fn position(&self) -> [f32; 3] {
        match self {
            Self::Mesh(e) => e.position,
            Self::Quad(e) => e.position,
            Self::Light(e) => e.position,
            Self::Fuzz(e) => e.position,
        }
    }
}

/// A fully-materialized map: header, grids, and indexed element lists.
///
/// A map is loaded whole, mutated in place, and saved whole; header
/// offset/size/count fields are recomputed on every [`Map::save`].
#[derive(Debug)]
pub struct Map {
    path: PathBuf,
    name: String,
    pub(crate) header: MapHeader,
    pub(crate) ground: Grid<u8>,
    pub(crate) tile: Grid<u8>,
    pub(crate) segment: Option<Grid<i16>>,
    pub(crate) meshes: ElementStore<MeshRecord>,
    pub(crate) quads: ElementStore<QuadRecord>,
    pub(crate) lights: ElementStore<LightRecord>,
    pub(crate) fuzz: ElementStore<FuzzRecord>,
}

impl Map {
    /// New empty map with the given ground dimensions.
    ///
    /// The tile and segment grids are sized at [`TILES_PER_GROUND`] times
    /// the ground dimensions; ground starts as "no ground", tiles and
    /// segments as their zero sentinels. The segment grid is present — use
    /// [`Map::strip_segment`] to model the older segmentless revision.
    pub fn new(ground_xsize: u32, ground_ysize: u32) -> Self {
        let tx = ground_xsize * TILES_PER_GROUND as u32;
        let ty = ground_ysize * TILES_PER_GROUND as u32;
        let header = MapHeader {
            signature: FixedBytes::new(MAP_SIGNATURE),
            ground_xsize,
            ground_ysize,
            version: 1,
            ..MapHeader::default()
        };
        Self {
            path: PathBuf::new(),
            name: String::new(),
            header,
            ground: Grid::filled(ground_xsize, ground_ysize, NO_GROUND),
            tile: Grid::filled(tx, ty, NO_TILE),
            segment: Some(Grid::filled(tx, ty, NO_SEGMENT)),
            meshes: ElementStore::new(),
            quads: ElementStore::new(),
            lights: ElementStore::new(),
            fuzz: ElementStore::new(),
        }
    }

    /// Load a map file, transparently gunzipping `.gz` paths.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormatError> {
        let path = path.as_ref();
        let bytes = read_map_bytes(path)?;
        let mut map = Self::from_bytes(&bytes)?;
        map.path = path.to_path_buf();
        map.name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(
            "{}: {}x{} ground, {} meshes, {} quads, {} lights, {} fuzz, segment: {}",
            map.name,
            map.header.ground_xsize,
            map.header.ground_ysize,
            map.meshes.len(),
            map.quads.len(),
            map.lights.len(),
            map.fuzz.len(),
            map.segment.is_some(),
        );
        Ok(map)
    }

    /// Decode a map from an in-memory file image.
    ///
    /// Section offsets come from the header, not from stream position, so
    /// sections need not be contiguous or in any particular order.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FormatError> {
        let mut r = ByteReader::new(bytes);
        let header =
            MapHeader::decode(&mut r).map_err(|t| FormatError::truncated("header", t))?;
        if *header.signature.as_bytes() != MAP_SIGNATURE {
            return Err(FormatError::BadSignature {
                found: *header.signature.as_bytes(),
            });
        }

        let gx = header.ground_xsize;
        let gy = header.ground_ysize;
        let tx = gx * TILES_PER_GROUND as u32;
        let ty = gy * TILES_PER_GROUND as u32;

        let ground = read_grid(&mut r, "ground", header.ground_offset, gx, gy)?;
        let tile = read_grid(&mut r, "tile", header.tile_offset, tx, ty)?;

        let mut map = Self {
            path: PathBuf::new(),
            name: String::new(),
            header,
            ground,
            tile,
            segment: None,
            meshes: ElementStore::new(),
            quads: ElementStore::new(),
            lights: ElementStore::new(),
            fuzz: ElementStore::new(),
        };

        map.meshes = read_elements(&mut r, &map.header)?;
        map.quads = read_elements(&mut r, &map.header)?;
        map.lights = read_elements(&mut r, &map.header)?;
        map.fuzz = read_elements(&mut r, &map.header)?;

        // The segment grid only exists in newer files; its offset is 0
        // otherwise.
        if map.header.segment_offset != 0 {
            map.segment = Some(read_grid(&mut r, "segment", map.header.segment_offset, tx, ty)?);
        }
        Ok(map)
    }

    /// Serialize to a file image, recomputing every header offset.
    ///
    /// Section order is fixed: ground, tile, mesh, quad, light, fuzz,
    /// segment (when present). The header lands last, in its reserved
    /// space at offset 0, once every section offset is known.
    pub fn to_bytes(&mut self) -> Vec<u8> {
        let header_size = MapHeader::layout().size();
        let capacity = header_size
            + self.ground.byte_len()
            + self.tile.byte_len()
            + self.meshes.len() * MeshRecord::layout().size()
            + self.quads.len() * QuadRecord::layout().size()
            + self.lights.len() * LightRecord::layout().size()
            + self.fuzz.len() * FuzzRecord::layout().size()
            + self.segment.as_ref().map_or(0, Grid::byte_len);
        let mut w = ByteWriter::with_capacity(capacity);
        w.zeros(header_size);

        self.header.ground_offset = w.position() as u32;
        self.ground.write_to(&mut w);
        self.header.tile_offset = w.position() as u32;
        self.tile.write_to(&mut w);

        write_elements(&mut w, &mut self.header, ElementKind::Mesh, &self.meshes);
        write_elements(&mut w, &mut self.header, ElementKind::Quad, &self.quads);
        write_elements(&mut w, &mut self.header, ElementKind::Light, &self.lights);
        write_elements(&mut w, &mut self.header, ElementKind::Fuzz, &self.fuzz);

        match &self.segment {
            Some(segment) => {
                self.header.segment_offset = w.position() as u32;
                segment.write_to(&mut w);
            }
            None => self.header.segment_offset = 0,
        }

        let mut hw = ByteWriter::with_capacity(header_size);
        self.header.encode(&mut hw);
        w.patch(0, &hw.into_bytes());
        w.into_bytes()
    }

    /// Save the map, staging the whole image in memory first.
    ///
    /// With no `path`, the map is written back where it was loaded from.
    /// A failure before the final write leaves the destination untouched.
    pub fn save(&mut self, path: Option<&Path>) -> Result<(), FormatError> {
        let image = self.to_bytes();
        let target = path.unwrap_or(&self.path).to_path_buf();
        debug!("{}: writing {} bytes to {}", self.name, image.len(), target.display());
        write_map_bytes(&target, &image)?;
        Ok(())
    }

    /// File name the map was loaded from, for messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the map was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The decoded header.
    pub fn header(&self) -> &MapHeader {
        &self.header
    }

    /// The full tile extent as an inclusive rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.tile.width() as i32 - 1, self.tile.height() as i32 - 1)
    }

    /// The ground grid.
    pub fn ground(&self) -> &Grid<u8> {
        &self.ground
    }

    /// Mutable ground grid.
    pub fn ground_mut(&mut self) -> &mut Grid<u8> {
        &mut self.ground
    }

    /// The tile grid.
    pub fn tile(&self) -> &Grid<u8> {
        &self.tile
    }

    /// Mutable tile grid.
    pub fn tile_mut(&mut self) -> &mut Grid<u8> {
        &mut self.tile
    }

    /// The segment grid, if this map carries one.
    pub fn segment(&self) -> Option<&Grid<i16>> {
        self.segment.as_ref()
    }

    /// Mutable segment grid, if this map carries one.
    pub fn segment_mut(&mut self) -> Option<&mut Grid<i16>> {
        self.segment.as_mut()
    }

    /// Drop the segment grid, as for files predating it.
    pub fn strip_segment(&mut self) {
        self.segment = None;
        self.header.segment_offset = 0;
    }

    /// The mesh store.
    pub fn meshes(&self) -> &ElementStore<MeshRecord> {
        &self.meshes
    }

    /// The quad store.
    pub fn quads(&self) -> &ElementStore<QuadRecord> {
        &self.quads
    }

    /// The light store.
    pub fn lights(&self) -> &ElementStore<LightRecord> {
        &self.lights
    }

    /// The fuzz store.
    pub fn fuzz(&self) -> &ElementStore<FuzzRecord> {
        &self.fuzz
    }

    /// Add a mesh, indexing it under its position.
    pub fn add_mesh(&mut self, record: MeshRecord) {
        self.meshes.insert(record);
    }

    /// Add a quad, indexing it under its position.
    pub fn add_quad(&mut self, record: QuadRecord) {
        self.quads.insert(record);
    }

    /// Add a light, indexing it under its position.
    pub fn add_light(&mut self, record: LightRecord) {
        self.lights.insert(record);
    }

    /// Add a fuzz anchor, indexing it under its position.
    pub fn add_fuzz(&mut self, record: FuzzRecord) {
        self.fuzz.insert(record);
    }

    /// Keep only lights satisfying `keep`, preserving relative order and
    /// spatial-index consistency. Returns the number removed.
    pub fn retain_lights<F>(&mut self, keep: F) -> usize
    where
        F: FnMut(&LightRecord) -> bool,
    {
        self.lights.retain(keep)
    }

    /// Every element of any kind whose spatial key falls inside `rect`,
    /// kind by kind in section order, row-major within a kind.
    pub fn elements_in(&self, rect: Rect) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.meshes
            .in_rect(rect)
            .map(ElementRef::Mesh)
            .chain(self.quads.in_rect(rect).map(ElementRef::Quad))
            .chain(self.lights.in_rect(rect).map(ElementRef::Light))
            .chain(self.fuzz.in_rect(rect).map(ElementRef::Fuzz))
    }

    /// Ground cells covered by a tile-coordinate rectangle, as
    /// `(ground_x, ground_y, value)`.
    pub fn ground_in(&self, rect: Rect) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.ground.iter_rect(rect.to_ground())
    }

    /// Tile cells inside a rectangle, as `(x, y, value)`.
    pub fn tiles_in(&self, rect: Rect) -> impl Iterator<Item = (i32, i32, u8)> + '_ {
        self.tile.iter_rect(rect)
    }
}

/// Decode the header of a map file without materializing the rest.
pub fn load_header(path: impl AsRef<Path>) -> Result<MapHeader, FormatError> {
    let bytes = read_map_bytes(path.as_ref())?;
    let mut r = ByteReader::new(&bytes);
    let header = MapHeader::decode(&mut r).map_err(|t| FormatError::truncated("header", t))?;
    if *header.signature.as_bytes() != MAP_SIGNATURE {
        return Err(FormatError::BadSignature {
            found: *header.signature.as_bytes(),
        });
    }
    Ok(header)
}

fn is_gzip_path(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "gz")
}

fn read_map_bytes(path: &Path) -> Result<Vec<u8>, FormatError> {
    let file = File::open(path)?;
    let mut bytes = Vec::new();
    if is_gzip_path(path) {
        GzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        let mut file = file;
        file.read_to_end(&mut bytes)?;
    }
    Ok(bytes)
}

fn write_map_bytes(path: &Path, bytes: &[u8]) -> Result<(), FormatError> {
    if is_gzip_path(path) {
        let mut encoder = GzEncoder::new(File::create(path)?, Compression::default());
        encoder.write_all(bytes)?;
        encoder.finish()?;
    } else {
        std::fs::write(path, bytes)?;
    }
    Ok(())
}

fn read_grid<T: crate::grid::Cell>(
    r: &mut ByteReader<'_>,
    section: &'static str,
    offset: u32,
    width: u32,
    height: u32,
) -> Result<Grid<T>, FormatError> {
    r.seek(offset as usize)
        .map_err(|t| FormatError::truncated(section, t))?;
    Grid::read_from(r, width, height).map_err(|t| FormatError::truncated(section, t))
}

/// Decode one kind's element section into a fresh store.
///
/// A zero size together with a zero count is the valid "feature absent"
/// state; any other size disagreement with the compiled descriptor is a
/// structural incompatibility.
fn read_elements<R>(
    r: &mut ByteReader<'_>,
    header: &MapHeader,
) -> Result<ElementStore<R>, FormatError>
where
    R: Record + Positioned + ElementRecord,
{
    let section = header.section(R::KIND);
    let mut store = ElementStore::new();
    if section.size == 0 && section.count == 0 {
        return Ok(store);
    }
    let expected = R::layout().size() as u32;
    if section.size != expected {
        return Err(FormatError::ElementSize {
            kind: R::KIND,
            declared: section.size,
            expected,
        });
    }
    r.seek(section.offset as usize)
        .map_err(|t| FormatError::truncated(R::KIND.name(), t))?;
    for _ in 0..section.count {
        let record =
            R::decode(r).map_err(|t| FormatError::truncated(R::KIND.name(), t))?;
        store.insert(record);
    }
    Ok(store)
}

fn write_elements<R>(
    w: &mut ByteWriter,
    header: &mut MapHeader,
    kind: ElementKind,
    store: &ElementStore<R>,
) where
    R: Record + Positioned,
{
    header.set_section(
        kind,
        Section {
            size: R::layout().size() as u32,
            count: store.len() as u32,
            offset: w.position() as u32,
        },
    );
    for record in store.iter() {
        record.encode(w);
    }
}

/// Ties each element record type to its [`ElementKind`] for section lookup.
pub trait ElementRecord {
    /// The kind whose header section describes this record type.
    const KIND: ElementKind;
}

impl ElementRecord for MeshRecord {
    const KIND: ElementKind = ElementKind::Mesh;
}

impl ElementRecord for QuadRecord {
    const KIND: ElementKind = ElementKind::Quad;
}

impl ElementRecord for LightRecord {
    const KIND: ElementKind = ElementKind::Light;
}

impl ElementRecord for FuzzRecord {
    const KIND: ElementKind = ElementKind::Fuzz;
}
