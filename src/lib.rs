//! Engagement document generator
//!
//! A small intake form for legal engagements. A submission is validated,
//! matched to a `.docx` engagement-letter template, has its `{{placeholder}}`
//! tokens filled in, and comes back as a download.
//!
//! ## Flow
//! Intake form -> validation -> template selection -> placeholder substitution
//! -> output directory -> attachment response
//!
//! ```rust,no_run
//! use engagement_docgen::{config::AppConfig, generation::DocumentGenerator, intake::Intake};
//!
//! let generator = DocumentGenerator::from_config(&AppConfig::default())?;
//! let intake = Intake {
//!     client_name: "Jordan".into(),
//!     client_type: "Individual".into(),
//!     matter_type: "Flat".into(),
//!     payment_method: "pay on invoice".into(),
//!     matter_description: "Lease review".into(),
//!     ..Default::default()
//! };
//! let generated = generator.generate(&intake)?;
//! println!("wrote {}", generated.path.display());
//! # Ok::<(), anyhow::Error>(())
//! ```

// Configuration
pub mod config;

// Naming helpers (slugs, engagement ids, artifact paths)
pub mod storage;

// Form fields and validation
pub mod intake;

// Template selection
pub mod templates;

// .docx placeholder substitution
pub mod docx;

// Validation -> selection -> substitution -> output
pub mod generation;

// HTTP routes
pub mod api;

pub use config::{AppConfig, SelectionStrategy};
pub use docx::{DocxError, DocxPackage, Replacements};
pub use generation::{DocumentGenerator, GeneratedDocument, GenerationError, OutputNaming};
pub use intake::{Intake, RetainerRule, ValidationError};
pub use templates::{Selection, SelectionError, TemplateDirectory, TemplateSelector};
