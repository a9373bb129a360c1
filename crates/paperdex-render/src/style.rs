//! Inline assets for the rendered page.

/// Client-side filter: case-insensitive substring match on the first
/// column, re-run on every keystroke. Rows without a `td` (the header)
/// always stay visible.
pub const SCRIPT: &str = r#"function filterRows() {
  var filter = document.getElementById("searchInput").value.toUpperCase();
  var rows = document.getElementById("papersTable").getElementsByTagName("tr");
  for (var i = 0; i < rows.length; i++) {
    var cell = rows[i].getElementsByTagName("td")[0];
    if (!cell) continue;
    var text = cell.textContent || cell.innerText;
    rows[i].style.display = text.toUpperCase().indexOf(filter) > -1 ? "" : "none";
  }
}"#;

pub const STYLE: &str = r#"#searchInput {
  width: 100%;
  font-size: 16px;
  padding: 4px;
  border: 1px solid #ddd;
  margin-bottom: 12px;
}

#papersTable {
  border-collapse: collapse;
  width: 100%;
  border: 1px solid #ddd;
  font-size: 18px;
}

#papersTable th, #papersTable td {
  text-align: left;
  padding: 12px;
}

#papersTable tr {
  border-bottom: 1px solid #ddd;
}

#papersTable tr.header, #papersTable tr:hover {
  background-color: #f1f1f1;
}"#;
