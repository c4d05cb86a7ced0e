//! HTML pages for the form surface.

use std::fmt::Write as _;

use clientes_core::Cliente;

use crate::flash::Flash;

/// Listing page.
pub fn list_page(clientes: &[Cliente], flashes: &[Flash]) -> String {
    let mut body = String::new();
    body.push_str("<h1>Clientes</h1>\n<p><a href=\"/cliente/nuevo\">Nuevo cliente</a></p>\n");
    if clientes.is_empty() {
        body.push_str("<p>No hay clientes cargados.</p>\n");
    } else {
        body.push_str(
            "<table>\n<thead><tr><th>Nombre</th><th>DNI</th><th>Email</th>\
             <th>Fecha de nacimiento</th><th></th></tr></thead>\n<tbody>\n",
        );
        for c in clientes {
            let id = c.id.to_string();
            let _ = write!(
                body,
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>\
                 <a href=\"/cliente/editar/{id}\">Editar</a> \
                 <form method=\"post\" action=\"/cliente/eliminar/{id}\" style=\"display:inline\">\
                 <button type=\"submit\">Eliminar</button></form></td></tr>\n",
                escape(&c.nombre),
                escape(c.dni.as_deref().unwrap_or("")),
                escape(c.email.as_deref().unwrap_or("")),
                escape(c.fecha_nacimiento.as_deref().unwrap_or("")),
            );
        }
        body.push_str("</tbody>\n</table>\n");
    }
    layout("Clientes", flashes, &body)
}

/// Creation page with an empty form.
pub fn new_page(flashes: &[Flash]) -> String {
    let mut body = String::from("<h1>Nuevo cliente</h1>\n");
    body.push_str(&cliente_form("/cliente/nuevo", None, "Crear"));
    layout("Nuevo cliente", flashes, &body)
}

/// Edit page prefilled with the stored record.
pub fn edit_page(cliente: &Cliente, flashes: &[Flash]) -> String {
    let mut body = String::from("<h1>Editar cliente</h1>\n");
    let action = format!("/cliente/editar/{}", cliente.id);
    body.push_str(&cliente_form(&action, Some(cliente), "Guardar"));
    layout("Editar cliente", flashes, &body)
}

/// Generic failure page; carries no error details.
pub fn error_page() -> String {
    layout(
        "Error",
        &[],
        "<h1>Error</h1>\n<p>Ocurrió un error inesperado.</p>\n<p><a href=\"/\">Volver</a></p>\n",
    )
}

fn cliente_form(action: &str, cliente: Option<&Cliente>, submit: &str) -> String {
    let value = |f: fn(&Cliente) -> Option<&str>| escape(cliente.and_then(f).unwrap_or(""));
    format!(
        "<form method=\"post\" action=\"{action}\">\n\
         <label>Nombre <input name=\"nombre\" value=\"{}\" required></label>\n\
         <label>DNI <input name=\"dni\" value=\"{}\"></label>\n\
         <label>Email <input name=\"email\" value=\"{}\"></label>\n\
         <label>Fecha de nacimiento <input name=\"fecha_nacimiento\" value=\"{}\" \
         placeholder=\"YYYY-MM-DD o DD/MM/YYYY\"></label>\n\
         <button type=\"submit\">{submit}</button> <a href=\"/\">Cancelar</a>\n\
         </form>\n",
        value(|c| Some(c.nombre.as_str())),
        value(|c| c.dni.as_deref()),
        value(|c| c.email.as_deref()),
        value(|c| c.fecha_nacimiento.as_deref()),
    )
}

fn layout(title: &str, flashes: &[Flash], body: &str) -> String {
    let mut html = format!(
        "<!doctype html>\n<html lang=\"es\">\n<head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n",
        escape(title)
    );
    if !flashes.is_empty() {
        html.push_str("<ul class=\"flashes\">\n");
        for f in flashes {
            let _ = writeln!(
                html,
                "<li class=\"{}\">{}</li>",
                f.kind.as_str(),
                escape(&f.message)
            );
        }
        html.push_str("</ul>\n");
    }
    html.push_str(body);
    html.push_str("</body>\n</html>\n");
    html
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
