use crate::foundation::error::{CodegenError, CodegenResult};
use crate::foundation::ids::NodeIdx;
use crate::generate::cppwinrt::CppwinrtStringifier;
use crate::generate::csharp::CSharpStringifier;
use crate::generate::emitter::{
    EmittedVariant, SharedImage, SharedObjects, SourceHeader, emit_source, emit_variant,
    variant_class_name,
};
use crate::generate::fingerprint::{DecisionFingerprint, VariantDecisions, fingerprint_decisions};
use crate::generate::stringifier::Stringifier;
use crate::model::object::{ImageSource, NodeFamily, ObjectKind, PropertySetValue};
use crate::model::source::{CodegenOpts, SourceDef, Target};
use crate::naming::namer::{describe, number_names};
use crate::session::plan::{GraphStats, VariantPlan};
use rayon::prelude::*;
use std::collections::BTreeSet;

/// Output of [`generate_source`].
#[derive(Debug, Clone)]
pub struct GeneratedSource {
    /// The generated file.
    pub text: String,
    /// Decisions per variant, in input order.
    pub decisions: Vec<VariantDecisions>,
    /// Digest of `decisions`.
    pub fingerprint: DecisionFingerprint,
    /// Counts per variant, in input order.
    pub stats: Vec<GraphStats>,
}

/// The stringifier for a target.
pub fn stringifier_for(target: Target) -> &'static dyn Stringifier {
    match target {
        Target::CSharp => &CSharpStringifier,
        Target::Cppwinrt => &CppwinrtStringifier,
    }
}

/// Generates one file holding a source class and a class per variant.
///
/// Variants are planned and emitted independently and, when `opts.parallel` is set, on the rayon
/// pool. Only image naming and the theme values cross variant boundaries; both are settled
/// between planning and emission. Results are collected in input order, so the output does not
/// depend on `parallel`.
#[tracing::instrument(skip(source, opts), fields(class = %source.class_name, variants = source.variants.len()))]
pub fn generate_source(source: &SourceDef, opts: &CodegenOpts) -> CodegenResult<GeneratedSource> {
    check_variants(source)?;

    let mut plans = fan_out(opts.parallel, &source.variants, |v| VariantPlan::build(v, opts))?;
    let images = share_images(&mut plans);
    let shared = SharedObjects {
        theme: theme_values(&plans),
        images,
    };

    let s = stringifier_for(opts.target);
    let emitted: Vec<EmittedVariant> = fan_out(opts.parallel, &plans, |p| {
        emit_variant(
            &p.graph,
            &variant_class_name(p.api_version),
            s,
            opts.disable_field_optimization,
        )
    })?;

    let header = SourceHeader {
        class_name: &source.class_name,
        namespace: &source.namespace,
        target: match opts.target {
            Target::CSharp => "C#",
            Target::Cppwinrt => "C++/WinRT",
        },
    };
    let text = emit_source(&header, &shared, &emitted, s);

    let decisions: Vec<VariantDecisions> = plans
        .iter()
        .zip(&emitted)
        .map(|(p, e)| p.decisions(e))
        .collect();
    let fingerprint = fingerprint_decisions(&decisions);
    let stats = plans.iter().map(VariantPlan::stats).collect();

    tracing::debug!(
        bytes = text.len(),
        images = shared.images.len(),
        themed = shared.theme.is_some(),
        %fingerprint,
        "source generated"
    );
    Ok(GeneratedSource {
        text,
        decisions,
        fingerprint,
        stats,
    })
}

fn check_variants(source: &SourceDef) -> CodegenResult<()> {
    if source.variants.is_empty() {
        return Err(CodegenError::precondition(format!(
            "source {} has no variants",
            source.class_name
        )));
    }
    let mut seen = BTreeSet::new();
    for v in &source.variants {
        if !seen.insert(v.api_version) {
            return Err(CodegenError::precondition(format!(
                "api version {} appears in more than one variant",
                v.api_version
            )));
        }
    }
    Ok(())
}

fn fan_out<T, R, F>(parallel: bool, items: &[T], f: F) -> CodegenResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> CodegenResult<R> + Sync + Send,
{
    if parallel {
        items.par_iter().map(f).collect()
    } else {
        items.iter().map(f).collect()
    }
}

/// Groups image surfaces of every variant by content and gives each group one name.
///
/// The first member of a group is described with the namer; the numbered name is then copied to
/// every other member, in every variant.
fn share_images(plans: &mut [VariantPlan]) -> Vec<SharedImage> {
    let mut groups: Vec<(ImageSource, Vec<(usize, NodeIdx)>)> = Vec::new();
    for (i, plan) in plans.iter().enumerate() {
        for (idx, _) in plan.graph.nodes_of(NodeFamily::LoadedImageSurface) {
            let ObjectKind::LoadedImageSurface { source, .. } = plan.graph.kind(idx) else {
                continue;
            };
            match groups.iter_mut().find(|(s, _)| s == source) {
                Some((_, members)) => members.push((i, idx)),
                None => groups.push((source.clone(), vec![(i, idx)])),
            }
        }
    }

    let bases: Vec<String> = groups
        .iter()
        .map(|(_, members)| {
            let (plan, idx) = members[0];
            describe(&plans[plan].graph, idx)
        })
        .collect();
    let names = number_names(&bases);

    let mut out = Vec::with_capacity(groups.len());
    for ((source, members), name) in groups.into_iter().zip(names) {
        for (plan, idx) in members {
            plans[plan].graph.node_mut(idx).name = Some(name.clone());
        }
        out.push(SharedImage { name, source });
    }
    tracing::debug!(images = out.len(), "images shared");
    out
}

/// Initial theme values, taken from the first themed variant.
fn theme_values(plans: &[VariantPlan]) -> Option<Vec<PropertySetValue>> {
    plans.iter().find_map(|p| {
        let ps = p.graph.unowned_property_set()?;
        match p.graph.kind(ps) {
            ObjectKind::PropertySet { values } => Some(values.clone()),
            _ => None,
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/session/generate.rs"]
mod tests;
