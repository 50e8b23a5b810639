#![no_main]

mod common;

use libfuzzer_sys::fuzz_target;
use the_lib::render::render_view_line_to_string;

use crate::common::line_from_bytes;

fuzz_target!(|data: &[u8]| {
  let line = line_from_bytes(data);
  let input = &line.input;

  let output = render_view_line_to_string(input);
  let again = render_view_line_to_string(&input.clone());
  assert_eq!(output.html, again.html);
  assert_eq!(output.character_mapping, again.character_mapping);

  assert_eq!(
    output.html.matches("<span").count(),
    output.html.matches("</span>").count()
  );

  let mapping = &output.character_mapping;
  let char_len = input.line_content.chars().count();
  if char_len > 0 {
    let rendered = input
      .stop_rendering_line_after
      .map_or(char_len, |stop| stop.min(char_len));
    assert_eq!(mapping.len(), rendered + 1);
    assert_eq!(output.is_overflowing, rendered < char_len);
  }

  let slots = mapping.inflate();
  assert!(slots.windows(2).all(|pair| {
    let key = |(part, ch, _): (u16, u16, u32)| (u32::from(part) << 16) | u32::from(ch);
    key(pair[0]) <= key(pair[1])
  }));

  if !line.has_decorations {
    for column in 1..=mapping.len() {
      assert_eq!(mapping.get_column(mapping.get_dom_position(column), 0), column);
    }
  }
});
