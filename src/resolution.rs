use std::{
    fmt::{self, Display, Formatter},
    sync::Arc,
};

use algebra::{cokernel, CoModule, Grading, Morphism, StructureError, StructureLine};
use itertools::Itertools;
use serde_json::{json, Value};

use crate::{
    envelope::resolve,
    utils::{ascii_num, Config},
};

/// A truncated minimal resolution `0 -> M -> F_0 -> F_1 -> ...` of a comodule by free comodules.
///
/// `morphisms[0]` is the zero map into `M` and `morphisms[s + 1]` maps into `F_s`. The domain of
/// each morphism is the codomain of the previous one.
#[derive(Debug, Clone)]
pub struct Resolution {
    comodule: Arc<CoModule>,
    morphisms: Vec<Morphism>,
}

/// Resolve `comodule` for `config.filtration_max` stages.
///
/// Each stage takes the cokernel of the previous map and embeds it into free comodules with
/// [`resolve`]. Stage `n` is computed up to `config.stage_limit(n)`, since the generators of later
/// stages live in higher gradings.
#[tracing::instrument(skip_all, fields(comodule = %comodule, stages = config.filtration_max))]
pub fn resolution(comodule: Arc<CoModule>, config: &Config) -> Resolution {
    assert_eq!(
        comodule.prime(),
        config.prime,
        "Resolving a comodule over a different field than configured"
    );

    let zero = Morphism::zero(Arc::new(comodule.zero_module()), Arc::clone(&comodule));
    let mut morphisms = vec![zero];

    for n in 0..config.filtration_max {
        let stage = morphisms.len();
        let coker = cokernel(&morphisms[stage - 1]);
        let injection = resolve(
            coker.codomain(),
            config.stage_limit(n),
            config.element_limit(),
        );
        let next = injection.compose(&coker);

        if config.verify {
            if let Err(e) = verify_stage(&coker, &next) {
                panic!("Stage {stage} is inconsistent: {e}");
            }
        }
        tracing::info!(
            stage,
            generators = next.codomain().generators().len(),
            dimension = next.codomain().dimension(),
            "computed stage"
        );
        morphisms.push(next);
    }

    let resolution = Resolution {
        comodule,
        morphisms,
    };
    if config.verify {
        if let Err(e) = resolution.verify() {
            panic!("Invalid resolution: {e}");
        }
    }
    resolution
}

/// Check the quotient of a stage, the projection onto it and the new stage. The quotient is the
/// only object carrying a module index, so this is where the two tensor tables are compared.
fn verify_stage(coker: &Morphism, next: &Morphism) -> Result<(), StructureError> {
    coker.codomain().verify()?;
    coker.verify()?;
    next.codomain().verify()
}

impl Resolution {
    pub fn comodule(&self) -> &Arc<CoModule> {
        &self.comodule
    }

    pub fn morphisms(&self) -> &[Morphism] {
        &self.morphisms
    }

    /// The free comodules `F_0, F_1, ...`.
    pub fn stages(&self) -> impl Iterator<Item = &Arc<CoModule>> + '_ {
        self.morphisms[1..].iter().map(Morphism::codomain)
    }

    /// Check that consecutive maps compose, that is the domain of each map has the same basis as
    /// the codomain of the previous one.
    pub fn verify(&self) -> Result<(), StructureError> {
        if self.morphisms[0].codomain().basis() != self.comodule.basis() {
            return Err(StructureError::Incompatible(
                "the first map does not land in the resolved comodule",
            ));
        }
        for pair in self.morphisms.windows(2) {
            if pair[1].domain().basis() != pair[0].codomain().basis() {
                return Err(StructureError::Incompatible(
                    "domain and codomain of consecutive maps do not match up",
                ));
            }
        }
        for morphism in &self.morphisms {
            morphism.verify()?;
        }
        Ok(())
    }

    /// The gradings of the generators of each stage, with stage `s` moved down by `(s, 0)`.
    pub fn grading(&self) -> Vec<Vec<Grading>> {
        self.stages()
            .enumerate()
            .map(|(s, module)| {
                let shift = Grading::new(-(s as i32), 0);
                module
                    .generators()
                    .iter()
                    .map(|g| g.grading + shift)
                    .collect()
            })
            .collect()
    }

    /// The structure lines of the map into each stage.
    pub fn structure_lines(&self) -> Vec<Vec<StructureLine>> {
        self.morphisms[1..]
            .iter()
            .map(Morphism::structure_lines)
            .collect()
    }

    /// A chart of the number of generators in each stage and shifted primary degree, with the last
    /// stage on top.
    pub fn graded_dimension_string(&self) -> String {
        let gradings = self.grading();
        let primaries = || gradings.iter().flatten().map(|g| g.primary);
        let (Some(min), Some(max)) = (primaries().min(), primaries().max()) else {
            return String::new();
        };

        let mut result = String::new();
        for stage in gradings.iter().rev() {
            for x in min..=max {
                result.push(ascii_num(stage.iter().filter(|g| g.primary == x).count()));
                result.push(' ');
            }
            result.push('\n');
            // If it is empty so far, don't print anything
            if result.trim_start().is_empty() {
                result.clear()
            }
        }
        result
    }

    /// The data needed to draw the chart: for every stage the shifted generator gradings, and the
    /// structure lines of the map into it. A line runs from a generator of the previous stage to
    /// one of this stage, and both ends are given as `[x, stage]`.
    pub fn to_json(&self) -> Value {
        let stages: Vec<Value> = self
            .morphisms[1..]
            .iter()
            .zip(self.grading())
            .enumerate()
            .map(|(s, (morphism, generators))| {
                let s = s as i32;
                let lines: Vec<Value> = morphism
                    .structure_lines()
                    .iter()
                    .map(|line| {
                        let ((source, _), (target, _)) = (line.source, line.target);
                        json!({
                            "source": [source.primary - s + 1, s - 1],
                            "target": [target.primary - s, s],
                            "primitive": line.primitive,
                        })
                    })
                    .collect();
                json!({
                    "generators": generators,
                    "structure_lines": lines,
                })
            })
            .collect();
        json!({
            "prime": self.comodule.prime(),
            "stages": stages,
        })
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Resolution:")?;
        for (i, morphism) in self.morphisms.iter().enumerate() {
            write!(f, "d_{i} : {morphism} | ")?;
            for g in morphism.codomain().generators() {
                write!(f, "{}, ", g.grading.primary - i as i32 + 1)?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;
        let field = format!("0 --> F_{}", self.comodule.prime());
        let symbols = self.stages().map(|module| module.symbol());
        write!(f, "{}", std::iter::once(field).chain(symbols).format(" --> "))
    }
}
