use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

use crate::catalog::index::FeatureIndex;
use crate::catalog::siblings::SiblingGraph;
use crate::core::annotation::Annotation;
use crate::core::segment::{Chromosome, DisplayMap, Segment};
use crate::core::types::{AnnotationId, ChromosomeId, LinkId, MapId, SegmentId};
use crate::utils::validation::{
    check_annotation_limit, check_segment_limit, parse_segment_label, validate_annotation,
    validate_length, ValidationError,
};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid catalog: {0}")]
    Invalid(#[from] ValidationError),
}

/// Catalog version for compatibility checking
pub const CATALOG_VERSION: &str = "1.0.0";

/// Serializable catalog format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogData {
    pub version: String,
    #[serde(default)]
    pub created_at: String,
    pub maps: Vec<DisplayMap>,
    pub chromosomes: Vec<ChromosomeRecord>,
    #[serde(default)]
    pub segments: Vec<SegmentRecord>,
    #[serde(default)]
    pub annotations: Vec<AnnotationRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChromosomeRecord {
    pub map: String,
    pub name: String,
    pub length: i64,
}

/// A displayed segment. Missing bounds default to the whole chromosome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentRecord {
    pub map: String,
    pub chromosome: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub map: String,
    pub chromosome: String,
    #[serde(default)]
    pub set: String,
    pub start: i64,
    pub stop: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkId>,
}

/// Registry of everything on display: maps, chromosomes, the displayed
/// segments in display order, and the annotations loaded for them.
#[derive(Debug, Default)]
pub struct DisplayCatalog {
    maps: Vec<DisplayMap>,
    chromosomes: Vec<Chromosome>,
    segments: Vec<Segment>,
    annotations: Vec<Annotation>,

    /// Index: map id -> index in maps vec
    map_to_index: HashMap<MapId, usize>,

    /// Index: (map, chromosome name) -> chromosome
    chromosome_by_name: HashMap<(MapId, String), ChromosomeId>,

    /// Index: external id or name -> annotations
    annotation_by_key: HashMap<String, Vec<AnnotationId>>,

    features: FeatureIndex,
    siblings: SiblingGraph,
}

impl DisplayCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load catalog from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse catalog from JSON string
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let data: CatalogData = serde_json::from_str(json)?;

        // Version check (warn but don't fail)
        if data.version != CATALOG_VERSION {
            warn!(
                "Catalog version mismatch (expected {}, found {})",
                CATALOG_VERSION, data.version
            );
        }

        let mut catalog = Self::new();
        for map in data.maps {
            catalog.add_map(map)?;
        }
        for record in data.chromosomes {
            catalog.add_chromosome(&MapId::new(record.map), record.name, record.length)?;
        }
        for record in data.segments {
            let chromosome = catalog.resolve_chromosome(&record.map, &record.chromosome)?;
            let length = catalog.chromosomes[chromosome.index()].length;
            catalog.add_segment(
                chromosome,
                record.start.unwrap_or(0),
                record.stop.unwrap_or(length),
            )?;
        }
        for record in data.annotations {
            let chromosome = catalog.resolve_chromosome(&record.map, &record.chromosome)?;
            validate_annotation(&record.name, record.start, record.stop)?;
            let mut annotation =
                Annotation::new(AnnotationId(0), record.name, chromosome, record.start, record.stop)
                    .with_set(record.set);
            annotation.external_id = record.id;
            annotation.links = record.links;
            catalog.insert_annotation(annotation, false)?;
        }
        catalog.features.sort();

        Ok(catalog)
    }

    /// Export catalog to JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        let data = CatalogData {
            version: CATALOG_VERSION.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            maps: self.maps.clone(),
            chromosomes: self
                .chromosomes
                .iter()
                .map(|c| ChromosomeRecord {
                    map: c.map.0.clone(),
                    name: c.name.clone(),
                    length: c.length,
                })
                .collect(),
            segments: self
                .segments
                .iter()
                .map(|s| SegmentRecord {
                    map: s.map.0.clone(),
                    chromosome: self.chromosomes[s.chromosome.index()].name.clone(),
                    start: Some(s.drawing_start),
                    stop: Some(s.drawing_stop),
                })
                .collect(),
            annotations: self
                .annotations
                .iter()
                .map(|a| {
                    let chromosome = &self.chromosomes[a.chromosome.index()];
                    AnnotationRecord {
                        id: a.external_id.clone(),
                        name: a.name.clone(),
                        map: chromosome.map.0.clone(),
                        chromosome: chromosome.name.clone(),
                        set: a.annotation_set.clone(),
                        start: a.start,
                        stop: a.stop,
                        links: a.links.clone(),
                    }
                })
                .collect(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    fn resolve_chromosome(&self, map: &str, name: &str) -> Result<ChromosomeId, ValidationError> {
        let map_id = MapId::new(map);
        if !self.map_to_index.contains_key(&map_id) {
            return Err(ValidationError::UnknownMap(map.to_string()));
        }
        self.chromosome_id(&map_id, name)
            .ok_or_else(|| ValidationError::UnknownChromosome {
                map: map.to_string(),
                name: name.to_string(),
            })
    }

    /// Register a display map
    pub fn add_map(&mut self, map: DisplayMap) -> Result<(), ValidationError> {
        if self.map_to_index.contains_key(&map.id) {
            return Err(ValidationError::DuplicateMap(map.id.0));
        }
        self.map_to_index.insert(map.id.clone(), self.maps.len());
        self.maps.push(map);
        Ok(())
    }

    /// Register a chromosome on an existing map
    pub fn add_chromosome(
        &mut self,
        map: &MapId,
        name: impl Into<String>,
        length: i64,
    ) -> Result<ChromosomeId, ValidationError> {
        let name = name.into();
        if !self.map_to_index.contains_key(map) {
            return Err(ValidationError::UnknownMap(map.0.clone()));
        }
        validate_length(&name, length)?;

        let key = (map.clone(), name.clone());
        if self.chromosome_by_name.contains_key(&key) {
            return Err(ValidationError::DuplicateChromosome {
                map: map.0.clone(),
                name,
            });
        }

        let id = ChromosomeId(self.chromosomes.len());
        self.chromosome_by_name.insert(key, id);
        self.chromosomes.push(Chromosome {
            id,
            name,
            map: map.clone(),
            length,
        });
        Ok(id)
    }

    /// Display a span of a chromosome; segments keep the order they were added in.
    /// `start > stop` displays the span reversed.
    pub fn add_segment(
        &mut self,
        chromosome: ChromosomeId,
        start: i64,
        stop: i64,
    ) -> Result<SegmentId, ValidationError> {
        let Some(chrom) = self.chromosomes.get(chromosome.index()) else {
            return Err(ValidationError::UnknownChromosome {
                map: String::new(),
                name: chromosome.to_string(),
            });
        };
        if let Some(msg) = check_segment_limit(self.segments.len()) {
            return Err(ValidationError::TooMany(msg));
        }

        let drawing_start = start.clamp(0, chrom.length);
        let drawing_stop = stop.clamp(0, chrom.length);
        if drawing_start == drawing_stop {
            return Err(ValidationError::EmptySegment(format!(
                "{}:{}",
                chrom.map, chrom.name
            )));
        }

        let id = SegmentId(self.segments.len());
        let segment = Segment {
            id,
            chromosome,
            map: chrom.map.clone(),
            drawing_start,
            drawing_stop,
        };
        self.segments.push(segment);
        Ok(id)
    }

    /// Add an annotation; its id is reassigned to its slot in the catalog
    pub fn add_annotation(
        &mut self,
        annotation: Annotation,
    ) -> Result<AnnotationId, ValidationError> {
        self.insert_annotation(annotation, true)
    }

    /// Bulk loads pass `sorted = false` and sort the feature index once at the end
    fn insert_annotation(
        &mut self,
        mut annotation: Annotation,
        sorted: bool,
    ) -> Result<AnnotationId, ValidationError> {
        if self.chromosomes.get(annotation.chromosome.index()).is_none() {
            return Err(ValidationError::UnknownChromosome {
                map: String::new(),
                name: annotation.chromosome.to_string(),
            });
        }
        if let Some(msg) = check_annotation_limit(self.annotations.len()) {
            return Err(ValidationError::TooMany(msg));
        }

        let id = AnnotationId(self.annotations.len());
        annotation.id = id;

        if let Some(external) = &annotation.external_id {
            self.annotation_by_key
                .entry(external.clone())
                .or_default()
                .push(id);
        }
        if annotation.external_id.as_deref() != Some(annotation.name.as_str()) {
            self.annotation_by_key
                .entry(annotation.name.clone())
                .or_default()
                .push(id);
        }

        if sorted {
            self.features.insert(&annotation);
        } else {
            self.features.push(&annotation);
        }
        self.siblings.insert(&annotation);
        self.annotations.push(annotation);
        Ok(id)
    }

    pub fn maps(&self) -> &[DisplayMap] {
        &self.maps
    }

    pub fn map(&self, id: &MapId) -> Option<&DisplayMap> {
        self.map_to_index.get(id).map(|&idx| &self.maps[idx])
    }

    pub fn chromosomes(&self) -> &[Chromosome] {
        &self.chromosomes
    }

    pub fn chromosome(&self, id: ChromosomeId) -> Option<&Chromosome> {
        self.chromosomes.get(id.index())
    }

    pub fn chromosome_id(&self, map: &MapId, name: &str) -> Option<ChromosomeId> {
        self.chromosome_by_name
            .get(&(map.clone(), name.to_string()))
            .copied()
    }

    /// Displayed segments, in display order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn segment(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.get(id.index())
    }

    /// First displayed segment for a `map:chromosome` label
    pub fn find_segment(&self, label: &str) -> Option<SegmentId> {
        let (map, chromosome) = parse_segment_label(label)?;
        let chromosome = self.chromosome_id(&MapId::new(map), chromosome)?;
        self.segments
            .iter()
            .find(|s| s.chromosome == chromosome)
            .map(|s| s.id)
    }

    /// `map:chromosome` label for a segment
    pub fn segment_label(&self, id: SegmentId) -> String {
        self.segment(id)
            .and_then(|s| self.chromosome(s.chromosome))
            .map_or_else(|| id.to_string(), |c| format!("{}:{}", c.map, c.name))
    }

    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn annotation(&self, id: AnnotationId) -> Option<&Annotation> {
        self.annotations.get(id.index())
    }

    /// Look up annotations by external id or name
    pub fn find_annotations(&self, key: &str) -> &[AnnotationId] {
        self.annotation_by_key
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Annotations on the segment's chromosome with an endpoint in `[start, stop]`
    pub fn segment_features(&self, segment: SegmentId, start: i64, stop: i64) -> Vec<AnnotationId> {
        let Some(segment) = self.segment(segment) else {
            return Vec::new();
        };
        self.features.touching(segment.chromosome, start, stop)
    }

    /// Annotations lying strictly between two positions on a chromosome
    pub fn features_between(
        &self,
        chromosome: ChromosomeId,
        after: i64,
        before: i64,
    ) -> Vec<AnnotationId> {
        self.features.between(chromosome, after, before)
    }

    pub fn siblings(&self) -> &SiblingGraph {
        &self.siblings
    }

    /// Number of annotations in catalog
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    /// Check if catalog has no annotations
    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}
