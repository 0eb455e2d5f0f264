//! Expectation suite: registration and per-record evaluation.

use crate::config::{PredicateErrorPolicy, QualityConfig};
use crate::error::{QualityError, QualityFailure};
use crate::expectation::{Action, Check, Expectation};
use crate::expr::EvalContext;
use crate::record::{render_record, Record};
use crate::report::{RunReport, ViolationCounts};
use crate::schema::StructType;
use crate::source::RecordSource;
use log::{debug, error, warn};

/// Builder for an [`ExpectationSuite`] with configuration options.
#[derive(Debug, Default)]
pub struct ExpectationSuiteBuilder {
    app_name: Option<String>,
    config: QualityConfig,
}

impl ExpectationSuiteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the suite with a pipeline name, used in violation logs.
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn config(mut self, config: QualityConfig) -> Self {
        self.config = config;
        self
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.config.case_sensitive = case_sensitive;
        self
    }

    pub fn on_predicate_error(mut self, policy: PredicateErrorPolicy) -> Self {
        self.config.on_predicate_error = policy;
        self
    }

    pub fn log_violations(mut self, log_violations: bool) -> Self {
        self.config.log_violations = log_violations;
        self
    }

    pub fn build(self) -> ExpectationSuite {
        ExpectationSuite {
            app_name: self.app_name,
            config: self.config,
            expectations: Vec::new(),
        }
    }
}

/// Ordered collection of expectations plus the evaluation context threaded
/// through every run. Expectations are declared once at pipeline-definition
/// time; each [`evaluate`](ExpectationSuite::evaluate) call owns its own
/// count accumulator, so concurrent runs over independent inputs are safe.
#[derive(Debug)]
pub struct ExpectationSuite {
    app_name: Option<String>,
    config: QualityConfig,
    expectations: Vec<Expectation>,
}

impl Default for ExpectationSuite {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpectationSuite {
    pub fn new() -> Self {
        ExpectationSuiteBuilder::new().build()
    }

    pub fn builder() -> ExpectationSuiteBuilder {
        ExpectationSuiteBuilder::new()
    }

    pub fn with_config(config: QualityConfig) -> Self {
        ExpectationSuiteBuilder::new().config(config).build()
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    /// Add an expectation to the active set. Names must be unique within
    /// the suite; uniqueness follows the configured case sensitivity.
    pub fn register(&mut self, expectation: Expectation) -> Result<(), QualityError> {
        let clash = self.expectations.iter().any(|existing| {
            if self.config.case_sensitive {
                existing.name() == expectation.name()
            } else {
                existing.name().eq_ignore_ascii_case(expectation.name())
            }
        });
        if clash {
            return Err(QualityError::DuplicateName {
                name: expectation.name().to_string(),
            });
        }
        self.expectations.push(expectation);
        Ok(())
    }

    /// Registered expectations in registration order.
    pub fn expectations(&self) -> &[Expectation] {
        &self.expectations
    }

    pub fn len(&self) -> usize {
        self.expectations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Lazily evaluate a record stream. Surviving records are yielded in
    /// input order; a FAIL abort is yielded once as `Err`, after which the
    /// iterator is fused.
    pub fn evaluate<I>(&self, records: I) -> Evaluated<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Record>,
    {
        Evaluated {
            suite: self,
            input: records.into_iter(),
            counts: self.fresh_counts(),
            schema: None,
            position: 0,
            done: false,
        }
    }

    /// Like [`evaluate`](Self::evaluate), pulling records and the schema
    /// snapshot from a source so diagnostics can name available fields.
    pub fn evaluate_source<'a>(
        &'a self,
        source: &'a dyn RecordSource,
    ) -> Evaluated<'a, Box<dyn Iterator<Item = Record> + 'a>> {
        Evaluated {
            suite: self,
            input: source.records(),
            counts: self.fresh_counts(),
            schema: source.schema(),
            position: 0,
            done: false,
        }
    }

    /// Eagerly drain [`evaluate`](Self::evaluate) into a report.
    pub fn run<I>(&self, records: I) -> Result<RunReport, QualityError>
    where
        I: IntoIterator<Item = Record>,
    {
        let mut evaluated = self.evaluate(records);
        let mut survivors = Vec::new();
        for item in evaluated.by_ref() {
            survivors.push(item?);
        }
        Ok(RunReport {
            records: survivors,
            counts: evaluated.into_counts(),
        })
    }

    /// Eagerly drain [`evaluate_source`](Self::evaluate_source) into a report.
    pub fn run_source(&self, source: &dyn RecordSource) -> Result<RunReport, QualityError> {
        let mut evaluated = self.evaluate_source(source);
        let mut survivors = Vec::new();
        for item in evaluated.by_ref() {
            survivors.push(item?);
        }
        Ok(RunReport {
            records: survivors,
            counts: evaluated.into_counts(),
        })
    }

    fn fresh_counts(&self) -> ViolationCounts {
        ViolationCounts::with_names(self.expectations.iter().map(|e| e.name()))
    }

    fn pipeline(&self) -> &str {
        self.app_name.as_deref().unwrap_or("rowguard")
    }

    /// Evaluate every expectation against one record, strictly in
    /// registration order. A DROP violation short-circuits the remaining
    /// expectations for the record; a FAIL violation aborts the run.
    fn check_record(
        &self,
        record: &Record,
        position: usize,
        counts: &mut ViolationCounts,
        schema: Option<&StructType>,
    ) -> Verdict {
        let ctx = EvalContext {
            case_sensitive: self.config.case_sensitive,
        };
        for (index, expectation) in self.expectations.iter().enumerate() {
            match expectation.check(record, &ctx) {
                Check::Pass => {}
                Check::Violation => {
                    counts.bump(index);
                    match expectation.action() {
                        Action::Warn => {
                            if self.config.log_violations {
                                warn!(
                                    "[{}] expectation '{}' violated at record {}: {}",
                                    self.pipeline(),
                                    expectation.name(),
                                    position,
                                    render_record(record)
                                );
                            }
                        }
                        Action::Drop => {
                            if self.config.log_violations {
                                debug!(
                                    "[{}] dropping record {} on expectation '{}'",
                                    self.pipeline(),
                                    position,
                                    expectation.name()
                                );
                            }
                            return Verdict::Dropped;
                        }
                        Action::Fail => {
                            if self.config.log_violations {
                                error!(
                                    "[{}] aborting on expectation '{}' at record {}",
                                    self.pipeline(),
                                    expectation.name(),
                                    position
                                );
                            }
                            return Verdict::Abort(
                                QualityFailure {
                                    expectation: expectation.name().to_string(),
                                    position,
                                    record: record.clone(),
                                    counts: counts.clone(),
                                }
                                .into(),
                            );
                        }
                    }
                }
                Check::Error(message) => {
                    counts.bump(index);
                    let message = self.describe_predicate_error(message, schema);
                    match self.config.on_predicate_error {
                        PredicateErrorPolicy::Warn => {
                            if self.config.log_violations {
                                warn!(
                                    "[{}] predicate of '{}' errored at record {}: {}",
                                    self.pipeline(),
                                    expectation.name(),
                                    position,
                                    message
                                );
                            }
                        }
                        PredicateErrorPolicy::ApplyAction => match expectation.action() {
                            Action::Warn => {
                                if self.config.log_violations {
                                    warn!(
                                        "[{}] predicate of '{}' errored at record {}: {}",
                                        self.pipeline(),
                                        expectation.name(),
                                        position,
                                        message
                                    );
                                }
                            }
                            Action::Drop => {
                                if self.config.log_violations {
                                    debug!(
                                        "[{}] dropping record {} on errored predicate '{}'",
                                        self.pipeline(),
                                        position,
                                        expectation.name()
                                    );
                                }
                                return Verdict::Dropped;
                            }
                            Action::Fail => {
                                return Verdict::Abort(QualityError::Predicate {
                                    expectation: expectation.name().to_string(),
                                    position,
                                    message,
                                });
                            }
                        },
                        PredicateErrorPolicy::Abort => {
                            return Verdict::Abort(QualityError::Predicate {
                                expectation: expectation.name().to_string(),
                                position,
                                message,
                            });
                        }
                    }
                }
            }
        }
        Verdict::Keep
    }

    fn describe_predicate_error(&self, message: String, schema: Option<&StructType>) -> String {
        match schema {
            Some(schema) if message.contains("not found") => {
                format!("{message}; available fields: {}", schema.field_names().join(", "))
            }
            _ => message,
        }
    }
}

enum Verdict {
    Keep,
    Dropped,
    Abort(QualityError),
}

/// Lazy, pull-based evaluation over a record stream.
///
/// Owns the run's violation counts; [`counts`](Evaluated::counts) exposes a
/// snapshot at any pull point, [`into_counts`](Evaluated::into_counts) the
/// final tallies.
pub struct Evaluated<'a, I> {
    suite: &'a ExpectationSuite,
    input: I,
    counts: ViolationCounts,
    schema: Option<StructType>,
    position: usize,
    done: bool,
}

impl<I> Evaluated<'_, I> {
    /// Violation counts accumulated so far.
    pub fn counts(&self) -> &ViolationCounts {
        &self.counts
    }

    pub fn into_counts(self) -> ViolationCounts {
        self.counts
    }

    /// Records pulled from the input so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<I> Iterator for Evaluated<'_, I>
where
    I: Iterator<Item = Record>,
{
    type Item = Result<Record, QualityError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let record = match self.input.next() {
                Some(record) => record,
                None => {
                    self.done = true;
                    return None;
                }
            };
            let verdict =
                self.suite
                    .check_record(&record, self.position, &mut self.counts, self.schema.as_ref());
            self.position += 1;
            match verdict {
                Verdict::Keep => return Some(Ok(record)),
                Verdict::Dropped => {}
                Verdict::Abort(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }
    }
}
