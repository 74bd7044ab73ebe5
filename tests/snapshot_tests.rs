//! Snapshot of a reflected class summary
//!
//! Review changes: `cargo insta review`

use tokenreflect::{ArrayKey, Broker, FunctionLike, ReflectionClass, ReflectionParameter, Value};

fn shop_broker() -> Broker {
    let mut broker = Broker::new();
    broker
        .process_source(include_str!("fixtures/contracts.php"), "shop/contracts.php")
        .expect("contracts failed");
    broker
        .process_source(include_str!("fixtures/support.php"), "shop/support.php")
        .expect("support failed");
    broker
        .process_source(include_str!("fixtures/shop.php"), "shop/shop.php")
        .expect("shop failed");
    broker
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format!("{f:?}"),
        Value::String(s) => format!("'{s}'"),
        Value::Array(items) => {
            let items: Vec<String> = items
                .iter()
                .map(|(key, value)| {
                    let key = match key {
                        ArrayKey::Int(i) => i.to_string(),
                        ArrayKey::String(s) => format!("'{s}'"),
                    };
                    format!("{key} => {}", render(value))
                })
                .collect();
            format!("[{}]", items.join(", "))
        }
    }
}

fn render_parameter(parameter: &ReflectionParameter) -> String {
    let mut out = String::new();
    if let Some(hint) = parameter.type_hint() {
        out.push_str(hint.written());
        out.push(' ');
    }
    if parameter.is_passed_by_reference() {
        out.push('&');
    }
    if parameter.is_variadic() {
        out.push_str("...");
    }
    out.push('$');
    out.push_str(parameter.name());
    if let Some(definition) = parameter.default_value_definition() {
        out.push_str(" = ");
        out.push_str(definition);
    }
    out
}

/// One line per header fact and member, inherited members included.
fn summarize(class: &ReflectionClass, broker: &Broker) -> String {
    let mut lines = vec![format!("class {}", class.name())];
    if let Some(parent) = class.parent_class_name() {
        lines.push(format!("  extends {parent}"));
    }
    lines.push(format!("  implements {}", class.interface_names(broker).unwrap().join(", ")));

    for (name, value) in class.constants(broker).unwrap() {
        lines.push(format!("  const {name} = {}", render(&value)));
    }

    for property in class.properties(broker).unwrap() {
        let mut line = format!("  {}", property.visibility());
        if property.is_static() {
            line.push_str(" static");
        }
        if property.is_readonly() {
            line.push_str(" readonly");
        }
        if let Some(hint) = property.type_hint() {
            line.push(' ');
            line.push_str(hint.written());
        }
        line.push_str(" $");
        line.push_str(property.name());
        if let Some(value) = property.default_value(broker).unwrap() {
            line.push_str(" = ");
            line.push_str(&render(value));
        }
        lines.push(line);
    }

    for method in class.methods(broker).unwrap() {
        let parameters: Vec<String> = method.parameters().iter().map(render_parameter).collect();
        let return_type = method
            .return_type()
            .map(|hint| format!(": {}", hint.written()))
            .unwrap_or_default();
        lines.push(format!(
            "  {} function {}{}({}){return_type} [{}]",
            method.visibility(),
            if method.returns_reference() { "&" } else { "" },
            method.name(),
            parameters.join(", "),
            method.declaring_class_name(),
        ));
    }
    lines.join("\n")
}

#[test]
fn test_book_summary() {
    let broker = shop_broker();
    let book = broker.get_class("Shop\\Book").unwrap();

    insta::assert_snapshot!(summarize(book, &broker), @r#"
    class Shop\Book
      extends Shop\Product
      implements Shop\Item, Shop\Contracts\Priced, Shop\Contracts\Named
      const KIND = 'book'
      const LIMIT = 99
      const FORMATS = [0 => 'paper', 1 => 'ebook', 'audio' => false]
      const MAX_QUANTITY = 99
      const PRECISION = 2
      public ?string $isbn = null
      public $legacy = null
      protected int $discount = 0
      public static $count = 0
      protected readonly string $name
      public function sku(): string [Shop\Book]
      public function &shelf(Shelf|Rack $where, int $quantity = Shop\Book::LIMIT, string ...$tags): array [Shop\Book]
      public function discount(): int [Shop\Discountable]
      public function __construct(string $name, ?float $price = null) [Shop\Product]
      public function name(): string [Shop\Product]
      public function price(): float [Shop\Product]
    "#);
}
