use crate::GenerateOptions;
use crate::Generator;
use crate::Passage;
use crate::Story;
use crate::Token;
use crate::TranscodeResult;

pub fn compile(tokens: &[Token]) -> TranscodeResult<String> {
	Generator::default().compile_passage(tokens)
}

pub fn generator_with_depth(max_depth: usize) -> Generator {
	Generator::new(GenerateOptions {
		max_depth,
		..GenerateOptions::default()
	})
}

/// `$name is value` as expression tokens.
pub fn equals(name: &str, value: &str) -> Vec<Token> {
	vec![
		Token::variable(name),
		Token::whitespace(),
		Token::operator("is"),
		Token::whitespace(),
		Token::number(value),
	]
}

/// `$name to value` as assignment clause tokens.
pub fn assign(name: &str, value: &str) -> Vec<Token> {
	vec![
		Token::variable(name),
		Token::whitespace(),
		Token::operator("to"),
		Token::whitespace(),
		Token::number(value),
	]
}

/// `(if: $a)[x]`, `(elseif: $b)[y]`, `(else:)[z]` with `separator` placed
/// between each hook and the next macro.
pub fn conditional_chain(separator: &[Token]) -> Vec<Token> {
	let mut tokens = vec![
		Token::macro_call("if", vec![Token::variable("a")]),
		Token::hook(vec![Token::text("x")]),
	];
	tokens.extend_from_slice(separator);
	tokens.push(Token::macro_call("elseif", vec![Token::variable("b")]));
	tokens.push(Token::hook(vec![Token::text("y")]));
	tokens.extend_from_slice(separator);
	tokens.push(Token::macro_call("else", vec![]));
	tokens.push(Token::hook(vec![Token::text("z")]));
	tokens
}

/// A hook nested `depth` levels deep.
pub fn nested_hooks(depth: usize) -> Vec<Token> {
	let mut tokens = vec![Token::text("deep")];
	for _ in 0..depth {
		tokens = vec![Token::hook(tokens)];
	}
	tokens
}

pub fn kitchen_story() -> Story {
	Story {
		name: "Kitchen".to_string(),
		start: Some("Start".to_string()),
		passages: vec![
			Passage {
				name: "Start".to_string(),
				tags: vec![],
				tokens: vec![
					Token::text("Hungry?"),
					Token::br(),
					Token::macro_call(
						"link",
						vec![Token::string("Eat"), Token::comma(), Token::string("Kitchen")],
					),
					Token::hook(vec![Token::macro_call("set", assign("fed", "1"))]),
				],
			},
			Passage {
				name: "Kitchen".to_string(),
				tags: vec!["room".to_string()],
				tokens: vec![Token::macro_call("print", vec![Token::variable("fed")])],
			},
		],
	}
}
