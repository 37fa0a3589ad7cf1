//! BEAM bindings (`Elixir.Folio.Native`)
//!
//! Documents are parsed once into a resource; every other call reads it.
//! Stored positions travel as `RangeData` maps, options as
//! `TraversalOptions` maps.

mod resource;
mod term;

use rustler::{Binary, Env, ResourceArc, Term};

use crate::dom::NodeId;
use crate::position::{
    decode as decode_address, encode as encode_address, highlight_id as locator_highlight_id,
    ElementInfo, FragmentAddressAdapter, Locator, NullCodec, PathAddress, RangeData,
    TraversalOptions,
};
use crate::strategy::parallel::resolve_parallel as resolve_batch;
use resource::{DocumentRef, DocumentResource};
use term::result_to_term;

fn element_info() -> ElementInfo<NullCodec> {
    ElementInfo::new(FragmentAddressAdapter::new(NullCodec))
}

fn locator(start: Option<RangeData>) -> Locator {
    start.map_or_else(Locator::start_of_document, Locator::RangeData)
}

// ============================================================================
// Documents and Addresses
// ============================================================================

/// Parse a content document (lenient, never fails)
#[rustler::nif]
fn parse(input: Binary) -> DocumentRef {
    ResourceArc::new(DocumentResource::new(input.as_slice()))
}

/// Path address of a node
#[rustler::nif]
fn encode<'a>(env: Env<'a>, doc_ref: DocumentRef, node: NodeId) -> Term<'a> {
    result_to_term(env, encode_address(&doc_ref.doc, node))
}

/// Node at a path address, or nil
#[rustler::nif]
fn decode(doc_ref: DocumentRef, address: PathAddress) -> Option<NodeId> {
    decode_address(&doc_ref.doc, &address)
}

// ============================================================================
// Traversal
// ============================================================================

/// The next text node after a stored position (nil = document start)
#[rustler::nif]
fn next_text_node<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    start: Option<RangeData>,
    options: TraversalOptions,
) -> Term<'a> {
    let result = element_info().next_text_node_data(&doc_ref.doc, &locator(start), &options);
    result_to_term(env, result)
}

/// The next whole word after a stored position (nil = document start)
#[rustler::nif]
fn next_word<'a>(
    env: Env<'a>,
    doc_ref: DocumentRef,
    start: Option<RangeData>,
    options: TraversalOptions,
) -> Term<'a> {
    let result = element_info().next_word_data(&doc_ref.doc, &locator(start), &options);
    result_to_term(env, result)
}

/// Text covered by a stored range, or nil if it no longer resolves
#[rustler::nif]
fn range_text<'a>(env: Env<'a>, doc_ref: DocumentRef, data: RangeData) -> Term<'a> {
    let doc = &doc_ref.doc;
    let result = data.resolve(doc).map(|range| range.map(|r| r.text(doc)));
    result_to_term(env, result)
}

// ============================================================================
// Highlights
// ============================================================================

/// Highlight id for a fragment identifier (binary) or a RangeData map
#[rustler::nif]
fn highlight_id(locator: Term) -> rustler::NifResult<String> {
    let locator = match locator.decode::<String>() {
        Ok(identifier) => Locator::Identifier(identifier),
        Err(_) => Locator::RangeData(locator.decode()?),
    };
    Ok(locator_highlight_id(&locator))
}

/// Re-resolve many stored ranges, returning each one normalized against
/// the current document (nil where it no longer resolves)
#[rustler::nif(schedule = "DirtyCpu")]
fn resolve_parallel<'a>(env: Env<'a>, doc_ref: DocumentRef, ranges: Vec<RangeData>) -> Term<'a> {
    let doc = &doc_ref.doc;
    let results: Vec<Term<'a>> = resolve_batch(doc, &ranges)
        .into_iter()
        .map(|resolved| {
            let normalized = resolved.and_then(|range| {
                range
                    .map(|r| RangeData::from_range(doc, &r))
                    .transpose()
            });
            result_to_term(env, normalized)
        })
        .collect();
    rustler::Encoder::encode(&results, env)
}

rustler::init!("Elixir.Folio.Native");
