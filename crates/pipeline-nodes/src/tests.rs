//! Whole-pipeline tests for the utility processors

use std::sync::Arc;

use weir_pipeline::{
	api::{InputSlot, Processor},
	pipeline::{pipeline::Pipeline, syntax::spec::PipelineSpec},
	runner::PipelineArgs,
};

use crate::{
	data::WeirData,
	func::Func,
	util::{constant::Constant, noop::Noop, print::Print},
};

fn get(out: &std::collections::HashMap<weir_pipeline::labels::PipelineVarID, WeirData>, var: &str) -> WeirData {
	out.get(&weir_pipeline::labels::PipelineVarID::new(var))
		.unwrap()
		.clone()
}

#[test]
fn constant_into_closure() {
	let mut spec = PipelineSpec::new();
	spec.add_node(&["two"], Arc::new(Constant::new(WeirData::Integer(2))), &[]);
	spec.add_node(
		&["four"],
		Arc::new(Func::new("Double", 1, 1, |input: Vec<WeirData>| {
			let x = input[0].as_integer().unwrap();
			Ok(vec![WeirData::Integer(x * 2)])
		})),
		&["two"],
	);

	let pipe = Pipeline::build("doubler", &spec).unwrap();
	let out = pipe.run(Vec::<WeirData>::new()).unwrap();

	assert_eq!(get(&out, "two").as_integer(), Some(2));
	assert_eq!(get(&out, "four").as_integer(), Some(4));
}

#[test]
fn closure_with_two_outputs() {
	let mut spec = PipelineSpec::new();
	spec.add_input("text", InputSlot::Index(0));
	spec.add_node(
		&["len", "upper"],
		Arc::new(Func::new("Measure", 1, 2, |input: Vec<WeirData>| {
			let s = input[0].as_text().unwrap().to_owned();
			Ok(vec![
				WeirData::Integer(s.len() as i64),
				WeirData::Text(s.to_uppercase().into()),
			])
		})),
		&["text"],
	);

	let pipe = Pipeline::build("measure", &spec).unwrap();
	let out = pipe.run(vec![WeirData::from("weir")]).unwrap();

	assert_eq!(get(&out, "len").as_integer(), Some(4));
	assert_eq!(get(&out, "upper").as_text(), Some("WEIR"));
}

#[test]
fn noop_fans_values_through() {
	let mut spec = PipelineSpec::new();
	spec.add_input("a", InputSlot::Index(0));
	spec.add_input("b", InputSlot::Index(1));
	spec.add_node(&["a2", "b2"], Arc::new(Noop::new(2)), &["a", "b"]);

	let pipe = Pipeline::build("rename", &spec).unwrap();
	let out = pipe
		.run(vec![WeirData::Integer(1), WeirData::from("x")])
		.unwrap();

	assert_eq!(get(&out, "a2").as_integer(), Some(1));
	assert_eq!(get(&out, "b2").as_text(), Some("x"));
}

#[test]
fn print_passes_through() {
	let mut spec = PipelineSpec::new();
	spec.add_input("v", InputSlot::Keyword);
	spec.add_node(&["seen"], Arc::new(Print::new()), &["v"]);

	let pipe = Pipeline::build("printer", &spec).unwrap();
	let out = pipe
		.run(PipelineArgs::new().named("v", WeirData::Float(2.5)))
		.unwrap();

	assert_eq!(get(&out, "seen").as_float(), Some(2.5));
}

#[test]
fn heterogeneous_values_in_one_run() {
	let join = Func::new("Join", 2, 1, |input: Vec<WeirData>| {
		let n = input[0].as_integer().unwrap();
		let s = input[1].as_text().unwrap();
		Ok(vec![WeirData::Text(format!("{s}-{n}").into())])
	});

	let mut spec = PipelineSpec::new();
	spec.add_input("n", InputSlot::Index(0));
	spec.add_node(&["s"], Arc::new(Constant::new(WeirData::from("item"))), &[]);
	spec.add_node(&["tag"], Arc::new(join), &["n", "s"]);

	let pipe = Pipeline::build("mixed", &spec).unwrap();
	let out = pipe.run(vec![WeirData::Integer(3)]).unwrap();

	assert_eq!(get(&out, "tag").as_text(), Some("item-3"));
}

#[test]
fn processor_arities_are_declared() {
	let c: Constant<WeirData> = Constant::new(WeirData::Integer(0));
	assert_eq!(Processor::<WeirData>::n_inputs(&c), 0);
	assert_eq!(Processor::<WeirData>::n_outputs(&c), 1);

	let n = Noop::new(3);
	assert_eq!(Processor::<WeirData>::n_inputs(&n), 3);
	assert_eq!(Processor::<WeirData>::n_outputs(&n), 3);
}
