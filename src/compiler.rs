use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use super::cities::{CityNameClassifier, UppercaseWord};
use super::config::CompilerConfig;
use super::direction::Annotator;
use super::error::CompileError;
use super::features::FeatureDecoder;
use super::utils::significant_lines;

pub const COMPILER_HEADER: &str = "# Generated by the bsc compiler. DO NOT EDIT!";

/// Header keywords echoed to the output, in lookup order.
pub const HEADER_KEYWORDS: [&str; 5] = ["name", "circulation", "color", "from", "to"];

const DIRECTION_MARKER: &str = "direction=";

/// Line metadata found before the first direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineHeader {
    pub name: Option<String>,
    pub circulation: Option<String>,
    pub color: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    /// Recognised header lines, verbatim and in source order
    pub lines: Vec<String>,
}

impl LineHeader {
    pub fn parse<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut header = LineHeader::default();
        for line in lines {
            let Some((keyword, value)) = HEADER_KEYWORDS.iter().find_map(|kw| {
                let value = line.strip_prefix(kw)?.strip_prefix('=')?;
                Some((*kw, value))
            }) else {
                continue;
            };
            let value = Some(value.to_string());
            match keyword {
                "name" => header.name = value,
                "circulation" => header.circulation = value,
                "color" => header.color = value,
                "from" => header.from = value,
                _ => header.to = value,
            }
            header.lines.push(line.to_string());
        }
        header
    }
}

/// Source text split at the `direction=` markers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocks<'a> {
    pub header: Vec<&'a str>,
    pub directions: Vec<Vec<&'a str>>,
}

impl<'a> Blocks<'a> {
    pub fn split(source: &'a str) -> Self {
        let mut blocks = Blocks::default();
        for line in significant_lines(source) {
            if line.starts_with(DIRECTION_MARKER) {
                blocks.directions.push(Vec::new());
            } else if let Some(direction) = blocks.directions.last_mut() {
                direction.push(line);
            } else {
                blocks.header.push(line);
            }
        }
        blocks
    }
}

/// Compiles bus line definitions.
pub struct Compiler {
    config: CompilerConfig,
    features: FeatureDecoder,
    classifier: Box<dyn CityNameClassifier>,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new(CompilerConfig::default())
    }
}

impl Compiler {
    pub fn new(config: CompilerConfig) -> Self {
        Compiler {
            features: config.feature_decoder(),
            config,
            classifier: Box::new(UppercaseWord),
        }
    }

    /// Replaces the rule telling city names from station names.
    pub fn with_classifier(mut self, classifier: impl CityNameClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn compile_file(&self, path: &Path) -> Result<String, CompileError> {
        let source = fs_err::read_to_string(path)?;
        let source_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.compile(&source, &source_name)
    }

    /// Compiles a whole line definition.
    ///
    /// Nothing is returned unless both directions validate.
    pub fn compile(&self, source: &str, source_name: &str) -> Result<String, CompileError> {
        let blocks = Blocks::split(source);
        if blocks.directions.len() != 2 {
            return Err(CompileError::DirectionCount {
                found: blocks.directions.len(),
            });
        }

        let header = LineHeader::parse(blocks.header.iter().copied());
        let annotator = Annotator {
            default_circulation: header
                .circulation
                .as_deref()
                .unwrap_or(&self.config.default_circulation),
            features: &self.features,
            classifier: self.classifier.as_ref(),
        };

        let mut output = [
            COMPILER_HEADER.to_string(),
            format!("# Compile: bsc {source_name}\n"),
        ]
        .into_iter()
        .chain(header.lines.iter().cloned())
        .collect::<Vec<String>>()
        .join("\n");
        output.push('\n');

        for (k, lines) in blocks.directions.iter().enumerate() {
            let index = k + 1;
            debug!(direction = index, lines = lines.len(), "compiling direction");
            let direction = annotator.annotate(index, lines)?;

            let mut seen = HashSet::new();
            let cities = &direction.context.cities;
            if let Some(spot) = cities.iter().find(|spot| !seen.insert(&spot.city)) {
                return Err(CompileError::DuplicateCity {
                    direction: index,
                    city: spot.city.clone(),
                    source_name: source_name.to_string(),
                    snapshot: Box::new(direction.context.snapshot()),
                });
            }
            output.push_str(&direction.text);
        }

        info!(source = source_name, "line compiled");
        Ok(output)
    }
}
